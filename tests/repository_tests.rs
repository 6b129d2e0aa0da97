use portfolio_api::models::Project;
use portfolio_api::repository::{InMemoryRepository, ProjectRepository};

fn project(id: &str, order_index: i32) -> Project {
    Project {
        id: id.to_string(),
        title: format!("Project {}", id),
        image_id: None,
        brief: "brief".to_string(),
        description: "description".to_string(),
        technologies: vec!["rust".to_string()],
        order_index,
    }
}

#[tokio::test]
async fn test_save_and_list_roundtrip() {
    let repo = InMemoryRepository::new();

    repo.save_project(&project("p1", 0)).await.unwrap();
    repo.save_project(&project("p2", 1)).await.unwrap();

    let mut projects = repo.list_projects().await.unwrap();
    projects.sort_by(|a, b| a.id.cmp(&b.id));

    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id, "p1");
    assert_eq!(projects[1].id, "p2");
}

#[tokio::test]
async fn test_save_upserts_by_identifier() {
    let repo = InMemoryRepository::new();

    repo.save_project(&project("p1", 0)).await.unwrap();

    let mut replacement = project("p1", 7);
    replacement.title = "Replaced".to_string();
    repo.save_project(&replacement).await.unwrap();

    let projects = repo.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Replaced");
    assert_eq!(projects[0].order_index, 7);
}

#[tokio::test]
async fn test_delete_is_silent_for_unknown_ids() {
    let repo = InMemoryRepository::new();

    repo.save_project(&project("p1", 0)).await.unwrap();
    repo.delete_project("ghost").await.unwrap();

    assert_eq!(repo.list_projects().await.unwrap().len(), 1);

    repo.delete_project("p1").await.unwrap();
    assert!(repo.list_projects().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failing_double_errors_on_every_operation() {
    let repo = InMemoryRepository::new_failing();

    assert!(repo.ensure_collection().await.is_err());
    assert!(repo.list_projects().await.is_err());
    assert!(repo.save_project(&project("p1", 0)).await.is_err());
    assert!(repo.delete_project("p1").await.is_err());
}
