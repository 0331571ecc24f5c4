use std::cell::RefCell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use taskdash_core::analytics::{DashboardMode, PriorityDistribution};
use taskdash_core::form::TaskForm;
use taskdash_core::list::TaskListView;
use taskdash_core::service::{MemoryTaskService, TaskService};
use taskdash_core::store::TaskStore;
use taskdash_core::{TaskDto, TaskPriority};

fn seed() -> Vec<TaskDto> {
    vec![
        TaskDto {
            id: "a".to_string(),
            title: "A".to_string(),
            description: "first".to_string(),
            due_date: "2099-01-01".to_string(),
            priority: TaskPriority::High,
            completed: false,
        },
        TaskDto {
            id: "b".to_string(),
            title: "B".to_string(),
            description: String::new(),
            due_date: "2000-01-01".to_string(),
            priority: TaskPriority::Low,
            completed: true,
        },
    ]
}

#[tokio::test]
async fn page_mount_create_edit_delete() {
    let service = MemoryTaskService::seeded(seed());
    let mut store = TaskStore::new();

    // The list subscribes to the store the way the page wires it.
    let list = Rc::new(RefCell::new(TaskListView::new()));
    let sink = list.clone();
    store.subscribe(move |tasks| sink.borrow_mut().sync(tasks));

    store.load(&service).await.expect("initial load");
    store.load(&service).await.expect("second load is a no-op");
    assert_eq!(service.fetch_count(), 1);
    assert_eq!(list.borrow().tasks().len(), 2);

    list.borrow_mut().sort_by_due_date();
    let order: Vec<String> = list.borrow().tasks().iter().map(|t| t.title.clone()).collect();
    assert_eq!(order, vec!["B".to_string(), "A".to_string()]);

    let mut form = TaskForm::new();
    form.set_title("C");
    form.set_due_date("2050-01-01");
    form.set_priority(TaskPriority::Medium);
    let created = form.submit(&service, &mut store).await.expect("create");
    assert_eq!(store.len(), 3);

    // The store notification re-applied the due-date sort.
    let order: Vec<String> = list.borrow().tasks().iter().map(|t| t.title.clone()).collect();
    assert_eq!(order, vec!["B".to_string(), "C".to_string(), "A".to_string()]);

    let now = Utc
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("valid instant");
    let summary = list.borrow().summary(now);
    assert_eq!(summary.mode, DashboardMode::Live);
    assert_eq!(
        summary.distribution,
        PriorityDistribution { high: 1, medium: 1, low: 1 }
    );
    assert_eq!(summary.distribution.total(), store.len());
    assert_eq!(summary.upcoming.len(), 2);

    // Edit and delete run against a list detached from the subscription so
    // the RefCell is not borrowed while the store notifies.
    let mut view = list.borrow().clone();
    view.edit(&created);
    if let Some(edit) = view.edit_form_mut() {
        edit.set_title("C2");
    }
    view.update(&service, &mut store).await.expect("update");
    assert_eq!(store.get(&created.id).map(|t| t.title.clone()), Some("C2".to_string()));
    assert_eq!(store.len(), 3);

    view.delete(&service, &mut store, "a").await.expect("delete");
    assert_eq!(store.len(), 2);
    assert!(store.get("a").is_none());
    assert_eq!(service.fetch_tasks().await.expect("refetch").len(), 2);
}

#[tokio::test]
async fn failed_initial_load_leaves_store_empty() {
    let service = MemoryTaskService::seeded(seed());
    service.set_failing(true);
    let mut store = TaskStore::new();

    let err = store.load(&service).await.expect_err("service down");

    assert!(err.is_service());
    assert!(store.is_empty());
    assert_eq!(store.revision(), 0);
}
