use lx_core::types::{Member, Signature, Ty, TypeDef, TypeOracle};
use lx_typing::TypeRegistry;
use pretty_assertions::assert_eq;

#[test]
fn constructed_members_are_substituted() {
    let registry = TypeRegistry::with_builtins();
    let members = registry.members(&Ty::list(Ty::string()));
    let add = members
        .iter()
        .filter_map(Member::as_method)
        .find(|m| m.name == "Add")
        .expect("List.Add");
    assert_eq!(add.params[0].ty, Ty::string());
    // Object members come through the base chain.
    assert!(members.iter().any(|m| m.name() == Some("ToString")));
}

#[test]
fn assignability_follows_bases_and_interfaces() {
    let registry = TypeRegistry::with_builtins();
    assert!(registry.is_assignable(&Ty::list(Ty::int32()), &Ty::enumerable(Ty::int32())));
    assert!(registry.is_assignable(&Ty::string(), &Ty::object()));
    assert!(registry.is_assignable(&Ty::int32(), &Ty::object()));
    assert!(!registry.is_assignable(&Ty::object(), &Ty::string()));
    assert!(registry.is_assignable(&Ty::array(Ty::char()), &Ty::enumerable(Ty::char())));
}

#[test]
fn numeric_widening_is_implicit_and_narrowing_explicit() {
    let registry = TypeRegistry::with_builtins();
    assert!(registry.is_implicitly_convertible(&Ty::int32(), &Ty::double()));
    assert!(!registry.is_implicitly_convertible(&Ty::double(), &Ty::int32()));
    assert!(registry.is_explicitly_convertible(&Ty::double(), &Ty::int32()));
    assert!(registry.is_explicitly_convertible(&Ty::object(), &Ty::string()));
    assert!(!registry.is_explicitly_convertible(&Ty::string(), &Ty::int32()));
}

#[test]
fn convertible_types_start_with_self_and_end_with_object() {
    let registry = TypeRegistry::with_builtins();
    let types = registry.convertible_types(&Ty::int32());
    assert_eq!(types.first(), Some(&Ty::int32()));
    assert_eq!(types.last(), Some(&Ty::object()));
    assert!(types.contains(&Ty::int64()));

    let strings = registry.convertible_types(&Ty::string());
    assert!(strings.contains(&Ty::enumerable(Ty::char())));
}

#[test]
fn delegate_signatures_are_closed_over_arguments() {
    let registry = TypeRegistry::with_builtins();
    assert_eq!(
        registry.delegate_signature(&Ty::func(vec![Ty::int32(), Ty::string()], Ty::bool())),
        Some(Signature::new(vec![Ty::int32(), Ty::string()], Ty::bool()))
    );
    assert_eq!(
        registry.delegate_signature(&Ty::action(vec![])),
        Some(Signature::new(vec![], Ty::void()))
    );
    assert_eq!(registry.delegate_signature(&Ty::string()), None);
}

#[test]
fn user_types_register_with_bases() {
    let registry = TypeRegistry::with_builtins();
    let animal = registry.register(TypeDef::class("Animal"));
    let dog = registry.register(TypeDef::class("Dog").with_base(animal.clone()));
    assert!(registry.is_assignable(&dog, &animal));
    assert_eq!(registry.inheritance_depth(&dog), 2);
    assert_eq!(registry.inheritance_depth(&Ty::object()), 0);
    assert_eq!(registry.lookup_by_name("List").len(), 1);
}

#[test]
fn value_types_and_interfaces_are_flagged() {
    let registry = TypeRegistry::with_builtins();
    assert!(registry.is_value_type(&Ty::int32()));
    assert!(!registry.is_value_type(&Ty::string()));
    assert!(registry.is_interface(&Ty::enumerable(Ty::int32())));
    assert!(!registry.supports_event_adapter());
    assert!(TypeRegistry::with_builtins()
        .with_event_adapter(true)
        .supports_event_adapter());
}
