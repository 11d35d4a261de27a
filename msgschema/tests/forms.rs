use msgschema::{
    apply_form, build_form, FieldDef, FieldType, FormControl, FormEntry, FormError, MessageSchema,
    MessageValue, SchemaRegistry, IMAGE_PATH_FIELD,
};

fn registry() -> SchemaRegistry {
    SchemaRegistry::with_builtins()
}

fn float_slider(entry: Option<&FormEntry>) -> &FormControl {
    match entry {
        Some(FormEntry::Control(control @ FormControl::FloatSlider { .. })) => control,
        other => panic!("expected float slider, got {other:?}"),
    }
}

#[test]
fn twist_form_mirrors_schema_shape() {
    let registry = registry();
    let schema = registry.resolve("geometry_msgs/Twist").unwrap();
    let form = build_form(&registry, schema);
    assert_eq!(form.len(), 2);

    for group_name in ["linear", "angular"] {
        let Some(FormEntry::Group(group)) = form.entry(group_name) else {
            panic!("expected group '{group_name}'");
        };
        assert_eq!(group.len(), 3);
        for axis in ["x", "y", "z"] {
            float_slider(group.entry(axis));
        }
    }
}

#[test]
fn header_gets_text_and_int_controls() {
    let registry = registry();
    let schema = registry.resolve("std_msgs/Header").unwrap();
    let form = build_form(&registry, schema);

    let Some(FormEntry::Group(stamp)) = form.entry("stamp") else {
        panic!("expected stamp group");
    };
    assert!(matches!(
        stamp.entry("sec"),
        Some(FormEntry::Control(FormControl::IntSlider { .. }))
    ));
    assert!(matches!(
        form.entry("frame_id"),
        Some(FormEntry::Control(FormControl::TextBox { .. }))
    ));
}

#[test]
fn unrepresentable_fields_are_skipped() {
    let registry = registry();
    let schema = registry.resolve("sensor_msgs/Imu").unwrap();
    let form = build_form(&registry, schema);
    // Covariance arrays have no control.
    let names: Vec<&str> = form.entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "header",
            "orientation",
            "angular_velocity",
            "linear_acceleration"
        ]
    );
}

#[test]
fn image_message_collapses_to_one_path_control() {
    let registry = registry();
    let schema = registry.resolve("sensor_msgs/Image").unwrap();
    let form = build_form(&registry, schema);
    assert_eq!(form.len(), 1);
    assert!(matches!(
        form.entry(IMAGE_PATH_FIELD),
        Some(FormEntry::Control(FormControl::ImagePath { .. }))
    ));
}

#[test]
fn applied_form_carries_edited_values() {
    let registry = registry();
    let schema = registry.resolve("geometry_msgs/Twist").unwrap().clone();
    let mut form = build_form(&registry, &schema);

    let control = form
        .control_mut_at(&["linear".to_string(), "x".to_string()])
        .expect("control exists");
    if let FormControl::FloatSlider { value, .. } = control {
        *value = 1.5;
    }

    let message = apply_form(&registry, &schema, &form).unwrap();
    assert_eq!(message.path("linear.x"), Some(&MessageValue::Float(1.5)));
    assert_eq!(message.path("linear.y"), Some(&MessageValue::Float(0.0)));
}

#[test]
fn integers_clamp_to_declared_width() {
    let mut registry = SchemaRegistry::new();
    registry
        .register(MessageSchema::new(
            "my_msgs/Narrow",
            vec![
                FieldDef::new("small", FieldType::UInt8),
                FieldDef::new("signed", FieldType::Int8),
            ],
        ))
        .unwrap();
    let schema = registry.resolve("my_msgs/Narrow").unwrap().clone();
    let mut form = build_form(&registry, &schema);

    if let Some(FormControl::IntSlider { value, .. }) = form.control_mut("small") {
        *value = 300;
    }
    if let Some(FormControl::IntSlider { value, .. }) = form.control_mut("signed") {
        *value = -300;
    }

    let message = apply_form(&registry, &schema, &form).unwrap();
    assert_eq!(message.field("small"), Some(&MessageValue::Int(255)));
    assert_eq!(message.field("signed"), Some(&MessageValue::Int(-128)));
}

#[test]
fn text_control_writes_through() {
    let registry = registry();
    let schema = registry.resolve("std_msgs/String").unwrap().clone();
    let mut form = build_form(&registry, &schema);
    if let Some(FormControl::TextBox { value }) = form.control_mut("data") {
        *value = "hello".to_string();
    }
    let message = apply_form(&registry, &schema, &form).unwrap();
    assert_eq!(message.field("data").and_then(|v| v.as_text()), Some("hello"));
}

#[test]
fn missing_image_file_is_an_error() {
    let registry = registry();
    let schema = registry.resolve("sensor_msgs/Image").unwrap().clone();
    let mut form = build_form(&registry, &schema);
    if let Some(FormControl::ImagePath { value }) = form.control_mut(IMAGE_PATH_FIELD) {
        *value = "/nonexistent/frame.png".to_string();
    }
    let err = apply_form(&registry, &schema, &form).unwrap_err();
    assert!(matches!(err, FormError::ImageUnreadable { .. }));
}

#[test]
fn image_file_fills_raw_fields() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("frame.png");
    let mut pixels = image::RgbImage::new(2, 1);
    pixels.put_pixel(0, 0, image::Rgb([255, 0, 0]));
    pixels.put_pixel(1, 0, image::Rgb([0, 255, 0]));
    pixels.save(&path).expect("write png");

    let registry = registry();
    let schema = registry.resolve("sensor_msgs/Image").unwrap().clone();
    let mut form = build_form(&registry, &schema);
    if let Some(FormControl::ImagePath { value }) = form.control_mut(IMAGE_PATH_FIELD) {
        *value = path.display().to_string();
    }

    let message = apply_form(&registry, &schema, &form).unwrap();
    assert_eq!(message.field("height"), Some(&MessageValue::Int(1)));
    assert_eq!(message.field("width"), Some(&MessageValue::Int(2)));
    assert_eq!(message.field("step"), Some(&MessageValue::Int(6)));
    assert_eq!(
        message.field("encoding").and_then(|v| v.as_text()),
        Some("rgb8")
    );
    assert_eq!(
        message.field("data"),
        Some(&MessageValue::Bytes(vec![255, 0, 0, 0, 255, 0]))
    );
}

#[test]
fn empty_image_path_is_unreadable() {
    let registry = registry();
    let schema = registry.resolve("sensor_msgs/Image").unwrap().clone();
    let form = build_form(&registry, &schema);
    let err = apply_form(&registry, &schema, &form).unwrap_err();
    assert!(matches!(err, FormError::ImageUnreadable { .. }));
}
