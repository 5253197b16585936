use serde_json::json;

use crate::drops::error::{ConflictError, DropsError};
use crate::drops::loader::{DropsLoader, ServicesLoader};
use crate::drops::named::{NamedModelsLoader, NamedServicesLoader};
use crate::drops::types::{DropValue, DropsType};
use crate::host::config::DropinConfig;
use crate::host::HostApplication;
use crate::resolver::{ModuleDef, ObjectRegistry};

use crate::tests::common::{get_current_user, json_value, MockApp};

fn service_registry(dropins: &[(&str, Vec<DropValue>)]) -> ObjectRegistry {
    let mut registry = ObjectRegistry::new();
    for (path, drops) in dropins {
        registry.register_module(*path, ModuleDef::new().drops("services", drops.clone()));
    }
    registry
}

fn attached_app() -> MockApp {
    let mut app = MockApp::new(DropinConfig::default());
    app.extensions_mut().init_dropin();
    app
}

#[test]
fn pairs_and_named_functions_register_under_their_names() {
    let registry = service_registry(&[(
        "dropins.site",
        vec![
            DropValue::pair("version", DropValue::Value(json!("1.1.1"))),
            DropValue::Function(get_current_user()),
        ],
    )]);
    let mut app = attached_app();
    NamedServicesLoader
        .register_drops(&mut app, &registry, "dropins.site")
        .unwrap();

    let state = app.extensions().dropin().unwrap();
    let services = state.get(&DropsType::Services).unwrap().as_named().unwrap();
    assert_eq!(json_value(services.get("version").unwrap()), &json!("1.1.1"));

    let DropValue::Function(user) = services.get("get_current_user").unwrap() else {
        panic!("expected the service function");
    };
    assert_eq!(user.call(), json!("tester"));
}

#[test]
fn the_same_name_from_two_dropins_is_a_conflict() {
    let registry = service_registry(&[
        (
            "dropins.auth",
            vec![DropValue::pair("version", DropValue::Value(json!("x")))],
        ),
        (
            "dropins.blog",
            vec![DropValue::pair("version", DropValue::Value(json!("x")))],
        ),
    ]);
    let mut app = attached_app();
    NamedServicesLoader
        .register_drops(&mut app, &registry, "dropins.auth")
        .unwrap();
    let err = NamedServicesLoader
        .register_drops(&mut app, &registry, "dropins.blog")
        .unwrap_err();

    assert!(matches!(
        err,
        DropsError::Conflict(ConflictError { key }) if key == "version"
    ));
    // The first dropin's value survives the failed merge.
    let state = app.extensions().dropin().unwrap();
    let services = state.get(&DropsType::Services).unwrap().as_named().unwrap();
    assert_eq!(json_value(services.get("version").unwrap()), &json!("x"));
    assert_eq!(services.len(), 1);
}

#[test]
fn named_models_aggregate_like_named_services() {
    let mut registry = ObjectRegistry::new();
    registry.register_module(
        "dropins.site",
        ModuleDef::new().drops(
            "models",
            vec![DropValue::pair("article", DropValue::Value(json!({"table": "articles"})))],
        ),
    );
    let mut app = attached_app();
    NamedModelsLoader
        .register_drops(&mut app, &registry, "dropins.site")
        .unwrap();

    let state = app.extensions().dropin().unwrap();
    let models = state.get(&DropsType::Models).unwrap().as_named().unwrap();
    assert_eq!(
        json_value(models.get("article").unwrap()),
        &json!({"table": "articles"})
    );
}

#[test]
fn an_unnamed_drop_is_rejected() {
    let registry = service_registry(&[("dropins.site", vec![DropValue::Value(json!("raw"))])]);
    let mut app = attached_app();
    let err = NamedServicesLoader
        .register_drops(&mut app, &registry, "dropins.site")
        .unwrap_err();
    assert!(matches!(
        err,
        DropsError::UnnamedDrop {
            drops_type: DropsType::Services,
            kind: "value",
            ..
        }
    ));
}

#[test]
fn named_and_plain_loaders_cannot_share_a_drops_type() {
    let registry = service_registry(&[(
        "dropins.site",
        vec![DropValue::pair("version", DropValue::Value(json!("1")))],
    )]);
    let mut app = attached_app();
    ServicesLoader
        .register_drops(&mut app, &registry, "dropins.site")
        .unwrap();
    let err = NamedServicesLoader
        .register_drops(&mut app, &registry, "dropins.site")
        .unwrap_err();
    assert!(matches!(err, DropsError::CollectionKind { .. }));
}
