use fleet_core::{Vehicle, VehicleValidationError};

#[test]
fn vehicle_new_sets_defaults() {
    let vehicle = Vehicle::new("ABC1234", "Civic");

    assert_eq!(vehicle.id, None);
    assert_eq!(vehicle.plate, "ABC1234");
    assert_eq!(vehicle.model, "Civic");
    assert_eq!(vehicle.brand, None);
    assert_eq!(vehicle.year, None);
    assert!(!vehicle.is_persisted());
    assert!(vehicle.validate().is_ok());
}

#[test]
fn display_lists_fields_in_fixed_order() {
    let mut vehicle = Vehicle::new("ABC1234", "Civic")
        .with_brand("Honda")
        .with_year(2020);
    vehicle.id = Some(7);

    assert_eq!(
        vehicle.to_string(),
        "<Vehicle id=7 plate=ABC1234 brand=Honda model=Civic year=2020>"
    );
}

#[test]
fn display_renders_absent_values_as_none() {
    let vehicle = Vehicle::new("XYZ9", "Corolla");
    assert_eq!(
        vehicle.to_string(),
        "<Vehicle id=None plate=XYZ9 brand=None model=Corolla year=None>"
    );
}

#[test]
fn same_record_requires_equal_assigned_ids() {
    let mut first = Vehicle::new("ABC1234", "Civic");
    let mut second = Vehicle::new("OTHER1", "Golf");
    assert!(!first.same_record(&first.clone()));

    first.id = Some(1);
    assert!(!first.same_record(&second));

    second.id = Some(1);
    assert!(first.same_record(&second));

    second.id = Some(2);
    assert!(!first.same_record(&second));
}

#[test]
fn validate_rejects_blank_required_fields() {
    let no_plate = Vehicle::new("", "Civic");
    assert_eq!(
        no_plate.validate().unwrap_err(),
        VehicleValidationError::MissingField("plate")
    );

    let no_model = Vehicle::new("ABC1234", "   ");
    assert_eq!(
        no_model.validate().unwrap_err(),
        VehicleValidationError::MissingField("model")
    );
}

#[test]
fn validate_enforces_declared_max_lengths() {
    assert!(Vehicle::new("ABCDEFGHIJ", "Civic").validate().is_ok());

    let long_plate = Vehicle::new("ABCDEFGHIJK", "Civic");
    assert_eq!(
        long_plate.validate().unwrap_err(),
        VehicleValidationError::FieldTooLong {
            field: "plate",
            max: 10,
            actual: 11,
        }
    );

    let long_brand = Vehicle::new("ABC1234", "Civic").with_brand("b".repeat(51));
    assert!(matches!(
        long_brand.validate().unwrap_err(),
        VehicleValidationError::FieldTooLong { field: "brand", .. }
    ));

    let long_model = Vehicle::new("ABC1234", "m".repeat(51));
    assert!(matches!(
        long_model.validate().unwrap_err(),
        VehicleValidationError::FieldTooLong { field: "model", .. }
    ));

    let max_text = Vehicle::new("ABC1234", "m".repeat(50)).with_brand("b".repeat(50));
    assert!(max_text.validate().is_ok());
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let mut vehicle = Vehicle::new("ABC1234", "Civic").with_brand("Honda");
    vehicle.id = Some(3);

    let json = serde_json::to_value(&vehicle).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["plate"], "ABC1234");
    assert_eq!(json["brand"], "Honda");
    assert_eq!(json["model"], "Civic");
    assert!(json["year"].is_null());

    let decoded: Vehicle = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, vehicle);
}

#[test]
fn deserialize_rejects_absent_plate() {
    let value = serde_json::json!({
        "plate": null,
        "model": "Civic"
    });

    let err = serde_json::from_value::<Vehicle>(value).unwrap_err();
    assert!(
        err.to_string().contains("vehicle field `plate` is required"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_over_long_plate() {
    let value = serde_json::json!({
        "plate": "ABCDEFGHIJK",
        "model": "Civic"
    });

    let err = serde_json::from_value::<Vehicle>(value).unwrap_err();
    assert!(err.to_string().contains("exceeds 10 characters"));
}
