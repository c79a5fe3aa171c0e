#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use crate::{Condition, DefMap, Definition, Error};

    fn norm(value: Value) -> Result<Definition, Error> {
        Definition::from_value(&value)
    }

    #[test]
    fn positional_arity_one_to_four() {
        let def = norm(json!(["show"])).unwrap();
        assert_eq!(def.action(), "show");
        assert_eq!(def.target(), None);
        assert_eq!(def.condition(), &Condition::Literal(true));
        assert_eq!(def.params(), &Value::Null);
        assert!(def.cacheable());
        assert!(def.prevent_default());

        let def = norm(json!(["show", "overlay"])).unwrap();
        assert_eq!(def.target(), Some("overlay"));

        let def = norm(json!(["show:hide", "overlay", "node.checked"])).unwrap();
        assert_eq!(def.condition(), &Condition::Script("node.checked".into()));

        let def = norm(json!(["class-add", "overlay", true, "active"])).unwrap();
        assert_eq!(def.params(), &json!("active"));
    }

    #[test]
    fn positional_arity_out_of_range_is_invalid() {
        assert!(matches!(norm(json!([])), Err(Error::Arity { len: 0 })));
        assert!(matches!(
            norm(json!(["show", "overlay", true, "x", "extra"])),
            Err(Error::Arity { len: 5 })
        ));
    }

    #[test]
    fn positional_wrong_types_are_invalid() {
        assert!(matches!(norm(json!([12])), Err(Error::Field { index: 0, .. })));
        assert!(matches!(
            norm(json!(["show", 5])),
            Err(Error::Field { index: 1, .. })
        ));
        assert!(matches!(
            norm(json!(["show", "overlay", ["nope"]])),
            Err(Error::Field { index: 2, .. })
        ));
    }

    #[test]
    fn explicit_false_condition_is_preserved() {
        let def = norm(json!(["show:hide", "overlay", false])).unwrap();
        assert_eq!(def.condition(), &Condition::Literal(false));
        assert_eq!(def.ternary().pick(false), Some("hide"));
    }

    #[test]
    fn named_form_overlays_defaults() {
        let def = norm(json!({
            "act": "toggle",
            "hook": "menu",
            "cache": false,
            "prevent": false,
        }))
        .unwrap();
        assert_eq!(def.action(), "toggle");
        assert_eq!(def.target(), Some("menu"));
        assert_eq!(def.condition(), &Condition::Literal(true));
        assert!(!def.cacheable());
        assert!(!def.prevent_default());
    }

    #[test]
    fn named_form_without_action_is_invalid() {
        assert!(matches!(
            norm(json!({"hook": "menu"})),
            Err(Error::MissingAction)
        ));
        assert!(matches!(
            norm(json!({"act": ""})),
            Err(Error::MissingAction)
        ));
    }

    #[test]
    fn named_form_unknown_field_is_invalid() {
        assert!(matches!(
            norm(json!({"act": "show", "hoook": "menu"})),
            Err(Error::Shape)
        ));
    }

    #[test]
    fn non_sequence_non_object_is_invalid() {
        assert!(matches!(norm(json!("show")), Err(Error::Shape)));
        assert!(matches!(norm(json!(17)), Err(Error::Shape)));
    }

    #[test]
    fn empty_target_means_self() {
        let def = norm(json!(["show", ""])).unwrap();
        assert_eq!(def.target(), None);
        let def = norm(json!({"act": "show", "hook": ""})).unwrap();
        assert_eq!(def.target(), None);
    }

    #[test]
    fn def_map_parses_events_in_declaration_order() {
        let map = DefMap::parse(
            r#"{"click": [["show", "overlay"], ["class-add", "", true, "pressed"]]}"#,
        )
        .unwrap();
        assert_eq!(map.events().collect::<Vec<_>>(), vec!["click"]);
        let defs = map.defs("click");
        assert_eq!(defs.len(), 2);
        let first = Definition::from_value(&defs[0]).unwrap();
        assert_eq!(first.action(), "show");
        assert!(map.defs("change").is_empty());
    }

    #[test]
    fn def_map_rejects_non_map_payload() {
        assert!(matches!(DefMap::parse("[1, 2]"), Err(Error::Map { .. })));
        assert!(matches!(DefMap::parse("not json"), Err(Error::Map { .. })));
        assert!(matches!(
            DefMap::parse(r#"{"click": "show"}"#),
            Err(Error::Map { .. })
        ));
    }

    #[test]
    fn mixed_forms_in_one_event_list() {
        let map = DefMap::parse(
            r#"{"change": [
                ["check", "terms"],
                {"act": "uncheck", "hook": "terms", "cdn": false}
            ]}"#,
        )
        .unwrap();
        let defs = map.defs("change");
        let a = Definition::from_value(&defs[0]).unwrap();
        let b = Definition::from_value(&defs[1]).unwrap();
        assert_eq!(a.action(), "check");
        assert_eq!(b.condition(), &Condition::Literal(false));
    }
}
