use treedrop::prelude::*;

#[test]
fn test_empty_overrides_keep_defaults() {
    assert_eq!(TreeOverrides::new().resolve(), TreeConfig::default());
}

#[test]
fn test_overrides_apply_field_by_field() {
    let config = TreeOverrides::new()
        .sort(false)
        .drop_target_offset(8.0)
        .resolve();

    assert!(!config.sort);
    assert_eq!(config.drop_target_offset, 8.0);
    // Untouched fields keep their defaults
    assert!(config.insert_droppable_first);
    assert_eq!(config.list_component, "ul");
    assert_eq!(config.initial_open, InitialOpen::None);
}

#[test]
fn test_merge_onto_custom_base() {
    let base = TreeConfig {
        list_component: "div".to_string(),
        ..TreeConfig::default()
    };
    let config = base.merge(
        TreeOverrides::new()
            .insert_droppable_first(false)
            .extra_accept_types(vec![native_types::FILE.to_string()]),
    );

    assert_eq!(config.list_component, "div");
    assert!(!config.insert_droppable_first);
    assert_eq!(config.extra_accept_types, vec!["__NATIVE_FILE__".to_string()]);
}

#[test]
fn test_overrides_from_json() {
    let json = r#"{
        "sort": false,
        "listComponent": "ol",
        "initialOpen": [1, 3]
    }"#;
    let overrides: TreeOverrides = serde_json::from_str(json).unwrap();
    let config = overrides.resolve();

    assert!(!config.sort);
    assert_eq!(config.list_component, "ol");
    assert_eq!(config.list_item_component, "li");
    assert_eq!(config.initial_open, InitialOpen::Ids(vec![NodeId(1), NodeId(3)]));
}

#[test]
fn test_overrides_from_empty_json() {
    let overrides: TreeOverrides = serde_json::from_str("{}").unwrap();
    assert_eq!(overrides, TreeOverrides::default());
}

#[test]
fn test_config_round_trips_through_json() {
    let config = TreeOverrides::new()
        .initial_open(InitialOpen::All)
        .resolve();
    let json = serde_json::to_value(&config).unwrap();

    assert_eq!(json["initialOpen"], serde_json::Value::Bool(true));
    assert_eq!(json["insertDroppableFirst"], serde_json::Value::Bool(true));
    let back: TreeConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_node_json_shape() {
    let node: Node<String> = serde_json::from_str(
        r#"{ "id": 4, "parent": 1, "droppable": true, "text": "Music", "data": "audio" }"#,
    )
    .unwrap();
    assert_eq!(node.id, NodeId(4));
    assert_eq!(node.parent, NodeId(1));
    assert_eq!(node.data.as_deref(), Some("audio"));

    let leaf: Node<String> =
        serde_json::from_str(r#"{ "id": 5, "parent": 0, "text": "a.txt" }"#).unwrap();
    assert!(!leaf.droppable);
    assert!(leaf.data.is_none());
    assert!(leaf.is_top_level());
}
