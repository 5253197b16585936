use std::sync::Arc;

use serde_json::json;

use crate::drops::loader::{DropsLoader, ModelsLoader};
use crate::drops::types::{DropSource, DropValue, DropsType};
use crate::resolver::error::ResolutionError;
use crate::resolver::{ModuleDef, ObjectRegistry, RegistryObject};

fn value_drops(value: serde_json::Value) -> DropSource {
    DropSource::Values(vec![DropValue::Value(value)])
}

/// Unwrap a resolved object into the drops it carries.
fn collected(object: &RegistryObject) -> Vec<DropValue> {
    match object {
        RegistryObject::Drops(source) => source.collect(),
        other => panic!("expected a drops object, got {other:?}"),
    }
}

#[test]
fn resolves_a_registered_module() {
    let mut registry = ObjectRegistry::new();
    registry.register_module("pkg.mod", ModuleDef::new());

    assert!(matches!(
        registry.resolve("pkg.mod").unwrap(),
        RegistryObject::Module(_)
    ));
}

#[test]
fn attribute_resolution_round_trips() {
    let mut registry = ObjectRegistry::new();
    registry.register_module(
        "pkg.mod",
        ModuleDef::new().drops("attr", value_drops(json!(42))),
    );

    // Resolving "pkg.mod:attr" yields the same object as resolving
    // "pkg.mod" and reading the attribute directly.
    let via_path = registry.resolve("pkg.mod:attr").unwrap();
    let RegistryObject::Module(module) = registry.resolve("pkg.mod").unwrap() else {
        panic!("expected a module");
    };
    let via_attr = module.get("attr").unwrap();

    let left = collected(&via_path);
    let right = collected(via_attr);
    assert_eq!(json!(42), *crate::tests::common::json_value(&left[0]));
    assert_eq!(json!(42), *crate::tests::common::json_value(&right[0]));
}

#[test]
fn unknown_module_fails_with_module_not_found() {
    let registry = ObjectRegistry::new();
    assert_eq!(
        registry.resolve("nowhere").unwrap_err(),
        ResolutionError::ModuleNotFound {
            path: "nowhere".to_string()
        }
    );
}

#[test]
fn unknown_attribute_fails_with_attribute_not_found() {
    let mut registry = ObjectRegistry::new();
    registry.register_module("pkg.mod", ModuleDef::new());

    assert_eq!(
        registry.resolve("pkg.mod:missing").unwrap_err(),
        ResolutionError::AttributeNotFound {
            module: "pkg.mod".to_string(),
            attribute: "missing".to_string(),
        }
    );
}

#[test]
fn attribute_lookup_on_a_non_module_fails() {
    let mut registry = ObjectRegistry::new();
    registry.register("pkg.flat", value_drops(json!(1)));

    assert!(matches!(
        registry.resolve("pkg.flat:anything").unwrap_err(),
        ResolutionError::AttributeNotFound { .. }
    ));
}

#[test]
fn resolution_is_idempotent() {
    let mut registry = ObjectRegistry::new();
    registry.register_module(
        "pkg.mod",
        ModuleDef::new().drops("attr", value_drops(json!("stable"))),
    );

    let first = collected(&registry.resolve("pkg.mod:attr").unwrap());
    let second = collected(&registry.resolve("pkg.mod:attr").unwrap());
    assert_eq!(
        crate::tests::common::json_value(&first[0]),
        crate::tests::common::json_value(&second[0])
    );
}

#[test]
fn later_registration_replaces_earlier() {
    let mut registry = ObjectRegistry::new();
    registry.register("pkg.obj", value_drops(json!("old")));
    registry.register("pkg.obj", value_drops(json!("new")));

    let drops = collected(&registry.resolve("pkg.obj").unwrap());
    assert_eq!(*crate::tests::common::json_value(&drops[0]), json!("new"));
}

#[test]
fn loader_objects_resolve_by_path() {
    let mut registry = ObjectRegistry::new();
    registry.register_loader("loaders.models", Arc::new(ModelsLoader));

    match registry.resolve("loaders.models").unwrap() {
        RegistryObject::Loader(loader) => assert_eq!(loader.drops_type(), DropsType::Models),
        other => panic!("expected a loader, got {other:?}"),
    }
}
