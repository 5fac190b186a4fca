//! Integration tests for the task/timer -> pet reward flow on a real database.

use petfocus_core::{
    Database, NewTask, PetFocus, Priority, Reward, Species, TaskStatus, TimerState,
};

fn open_app(dir: &std::path::Path) -> PetFocus<Database> {
    let db = Database::open_at(&dir.join("petfocus.db")).unwrap();
    PetFocus::load(db).unwrap()
}

#[test]
fn test_rex_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = open_app(tmp.path());

    let rex = app
        .pets_mut()
        .apply(|p| p.adopt_pet("Rex", Species::Dog))
        .unwrap();
    assert_eq!(rex.level, 1);
    assert_eq!(rex.happiness, 85);
    assert_eq!(rex.energy, 95);
    assert_eq!(rex.hunger, 40);
    assert!(rex.is_active);

    let outcome = app
        .pets_mut()
        .apply(|p| p.add_experience(&rex.id, 250))
        .unwrap()
        .unwrap();
    assert_eq!(outcome.experience, 250);
    assert_eq!(outcome.level, 3);

    let pet = app.pets().pet(&rex.id).unwrap();
    assert_eq!(pet.happiness, 100);
    assert_eq!(pet.evolution_stage, 1);
    assert_eq!(pet.stage_name(), "Growing Dog");
}

#[test]
fn test_work_day_persists_across_restarts() {
    let tmp = tempfile::tempdir().unwrap();
    let pet_id;
    {
        let mut app = open_app(tmp.path());
        pet_id = app
            .pets_mut()
            .apply(|p| p.adopt_pet("Whiskers", Species::Cat))
            .unwrap()
            .id;

        let high = app
            .tasks_mut()
            .apply(|t| t.add_task(NewTask::new("Quarterly report", Priority::High)))
            .unwrap();
        let medium = app
            .tasks_mut()
            .apply(|t| t.add_task(NewTask::new("Inbox zero", Priority::Medium)))
            .unwrap();
        app.tasks_mut().apply(|t| t.start_task(&medium.id).cloned()).unwrap();

        assert_eq!(app.complete_task(&high.id).unwrap().reward, Reward { xp: 50, treats: 2 });
        assert_eq!(app.complete_task(&medium.id).unwrap().reward, Reward { xp: 30, treats: 1 });

        app.start_timer(2).unwrap();
        let mut completions = 0;
        for _ in 0..120 {
            if app.tick().unwrap().is_some() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    let app = open_app(tmp.path());
    let pet = app.pets().pet(&pet_id).unwrap();
    assert_eq!(pet.experience, 50 + 30 + 4);
    assert_eq!(pet.level, 1);

    let stats = app.tasks().completion_stats();
    assert_eq!(stats.completed, 2);
    assert_eq!(app.tasks().tasks_by_status(TaskStatus::Completed).len(), 2);

    assert_eq!(app.timer().state(), TimerState::Idle);
    assert_eq!(app.timer().total_focus_time(), 2);
    assert_eq!(app.timer().todays_focus_time(), 2);
}

#[test]
fn test_reset_before_completion_leaves_history_unchanged() {
    let tmp = tempfile::tempdir().unwrap();
    let mut app = open_app(tmp.path());
    let before = app.timer().sessions().len();

    app.start_timer(25).unwrap();
    for _ in 0..10 {
        app.tick().unwrap();
    }
    app.timer_mut().apply(|t| t.reset()).unwrap();

    assert_eq!(app.timer().sessions().len(), before);
    drop(app);
    let app = open_app(tmp.path());
    assert_eq!(app.timer().sessions().len(), before);
    assert_eq!(app.timer().time_left_secs(), 25 * 60);
}
