/// Объявляет newtype-идентификатор поверх `i64`
///
/// Все агрегаты системы нумеруются автоинкрементом SQLite.
#[macro_export]
macro_rules! int_aggregate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::int_aggregate_id!(SampleId);

    #[test]
    fn test_id_is_plain_number_on_the_wire() {
        let id = SampleId(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(serde_json::from_str::<SampleId>("7").unwrap(), SampleId(7));
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.value(), 42);
    }
}
