//! Typed ID definitions for all planner resources.

use crate::define_id;

define_id!(PeriodId, "period");
define_id!(SkillId, "skill");
define_id!(ProjectId, "project");
define_id!(ComponentId, "component");
define_id!(ContributorId, "contributor");

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_component_id_parse() {
        let id: ComponentId = "17".parse().unwrap();
        assert_eq!(id, ComponentId::new(17));
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id: PeriodId = " 3 ".parse().unwrap();
        assert_eq!(id.value(), 3);
    }

    #[test]
    fn test_empty() {
        let err = "".parse::<ProjectId>().unwrap_err();
        assert!(err.is_empty());
        assert_eq!(err.kind(), "project");
    }

    #[test]
    fn test_negative() {
        let err = "-4".parse::<SkillId>().unwrap_err();
        assert!(matches!(err, crate::IdError::Negative { value: -4, .. }));
    }

    #[test]
    fn test_not_a_number() {
        let err = "abc".parse::<ContributorId>().unwrap_err();
        assert!(matches!(err, crate::IdError::InvalidNumber { .. }));
        assert_eq!(
            err.to_string(),
            "invalid contributor ID 'abc': expected a non-negative integer"
        );
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ComponentId::new(9)).unwrap();
        assert_eq!(json, "9");
    }

    #[test]
    fn test_deserializes_number_or_string() {
        let from_number: ComponentId = serde_json::from_str("12").unwrap();
        let from_string: ComponentId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(from_number, from_string);
    }

    #[test]
    fn test_deserialize_rejects_negative_and_garbage() {
        assert!(serde_json::from_str::<PeriodId>("-1").is_err());
        assert!(serde_json::from_str::<PeriodId>("\"x1\"").is_err());
        assert!(serde_json::from_str::<PeriodId>("1.5").is_err());
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(value in any::<u64>()) {
            let id = ProjectId::new(value);
            let parsed: ProjectId = id.to_string().parse().unwrap();
            prop_assert_eq!(id, parsed);
        }
    }
}
