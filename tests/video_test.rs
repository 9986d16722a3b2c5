use dashpage::error::VideoError;
use dashpage::video::{PlayerState, VideoCatalog};

const CATALOG: &str = r#"{
    "title": "还珠格格第一部",
    "synopsis": "一部古装喜剧",
    "episodes": [
        {"url": "https://example.com/ep1.mp4", "title": "第1集", "episode": 1},
        {"url": "https://example.com/ep2.mp4", "title": "第2集", "episode": 2},
        {"url": "https://example.com/ep3.mp4", "title": "第3集", "episode": 3}
    ]
}"#;

fn catalog() -> VideoCatalog {
    VideoCatalog::from_json_str(CATALOG).unwrap()
}

#[test]
fn test_player_starts_at_first_episode() {
    let catalog = catalog();
    let player = PlayerState::new();

    assert_eq!(player.index(), 0);
    assert_eq!(player.current(&catalog).unwrap().url, "https://example.com/ep1.mp4");
    println!("✓ New session shows episode 1");
}

#[test]
fn test_select_switches_episode() {
    let catalog = catalog();
    let mut player = PlayerState::new();

    player.select(2, &catalog).unwrap();

    assert_eq!(player.index(), 2);
    assert_eq!(player.current(&catalog).unwrap().episode, 3);
    println!("✓ Selecting index 2 shows episode 3");
}

#[test]
fn test_out_of_range_select_is_rejected() {
    let catalog = catalog();
    let mut player = PlayerState::new();
    player.select(1, &catalog).unwrap();

    let err = player.select(3, &catalog).unwrap_err();

    assert!(matches!(err, VideoError::OutOfRange { index: 3, len: 3 }));
    assert_eq!(player.index(), 1);
    println!("✓ Out-of-range index leaves the selection alone");
}

#[test]
fn test_button_labels() {
    let labels: Vec<String> = catalog().episodes.iter().map(|e| e.button_label()).collect();
    assert_eq!(labels, vec!["第1集", "第2集", "第3集"]);
    println!("✓ Buttons labelled 第n集");
}

#[test]
fn test_empty_catalog_is_rejected() {
    let err = VideoCatalog::from_json_str(r#"{"title": "空", "episodes": []}"#).unwrap_err();
    assert!(matches!(err, VideoError::EmptyCatalog));

    let err = VideoCatalog::from_json_str("not json").unwrap_err();
    assert!(matches!(err, VideoError::Json(_)));
    println!("✓ Empty and malformed catalogs rejected");
}

#[test]
fn test_bundled_catalog_loads() {
    let catalog = VideoCatalog::from_json_file("data/videos.json").unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.title, "还珠格格第一部");
    assert!(!catalog.synopsis.is_empty());
    println!("✓ data/videos.json parses");
}
