/// Implement [`Introspect`](crate::Introspect) for a record type.
///
/// Lists the record's properties in declaration order, each with an optional
/// bracketed set of [`Annotation`](crate::Annotation)s. Annotation variants
/// are in scope unqualified inside the brackets. Every listed field's type
/// must itself implement `Introspect`.
///
/// ```rust
/// use objconf::{Introspect, NamedContainer, introspect};
///
/// #[derive(Default)]
/// struct Assembly {
///     name: String,
///     components: NamedContainer<String>,
///     weight: f64,
/// }
///
/// introspect! {
///     Assembly {
///         name,
///         components: [Expandable, DisplayName("Components")],
///         weight: [Category("Physical"), Description("Mass in kg.")],
///     }
/// }
///
/// let a = Assembly::default();
/// assert!(a.property("components").unwrap().is_expandable());
/// assert_eq!(a.property("weight").unwrap().category(), Some("Physical"));
/// ```
#[macro_export]
macro_rules! introspect {
    ($ty:ident { $( $field:ident $( : [ $( $ann:expr ),* $(,)? ] )? ),* $(,)? }) => {
        impl $crate::Introspect for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn node(&self) -> Option<&dyn $crate::Introspect> {
                Some(self)
            }

            fn node_mut(&mut self) -> Option<&mut dyn $crate::Introspect> {
                Some(self)
            }

            fn render(&self) -> String {
                stringify!($ty).to_string()
            }

            fn properties(&self) -> Vec<$crate::Property<'_>> {
                vec![$(
                    $crate::Property {
                        name: stringify!($field),
                        annotations: {
                            #[allow(unused_imports)]
                            use $crate::Annotation::*;
                            const ANNOTATIONS: &[$crate::Annotation] = &[$( $( $ann ),* )?];
                            ANNOTATIONS
                        },
                        value: &self.$field,
                    },
                )*]
            }

            fn property_mut(&mut self, name: &str) -> Option<&mut dyn $crate::Introspect> {
                match name {
                    $( stringify!($field) => Some(&mut self.$field), )*
                    _ => None,
                }
            }
        }
    };
}

/// Implement [`Introspect`](crate::Introspect) for a fieldless enum.
///
/// The enum renders as its variant name and accepts a variant name on
/// assignment.
///
/// ```rust
/// use objconf::{Introspect, introspect_enum};
///
/// #[derive(Default, Debug, PartialEq)]
/// enum Command {
///     #[default]
///     TurnOff,
///     TurnOn,
/// }
///
/// introspect_enum!(Command { TurnOff, TurnOn });
///
/// let mut c = Command::default();
/// c.assign("TurnOn").unwrap();
/// assert_eq!(c, Command::TurnOn);
/// assert_eq!(c.render(), "TurnOn");
/// ```
#[macro_export]
macro_rules! introspect_enum {
    ($ty:ident { $( $variant:ident ),+ $(,)? }) => {
        impl $crate::Introspect for $ty {
            fn type_name(&self) -> &'static str {
                stringify!($ty)
            }

            fn node(&self) -> Option<&dyn $crate::Introspect> {
                Some(self)
            }

            fn node_mut(&mut self) -> Option<&mut dyn $crate::Introspect> {
                Some(self)
            }

            fn render(&self) -> String {
                match self {
                    $( $ty::$variant => stringify!($variant), )+
                }
                .to_string()
            }

            fn choices(&self) -> Option<&'static [&'static str]> {
                Some(&[$( stringify!($variant) ),+])
            }

            fn assign(&mut self, text: &str) -> Result<(), $crate::AssignError> {
                *self = match text.trim() {
                    $( stringify!($variant) => $ty::$variant, )+
                    other => {
                        return Err($crate::AssignError::UnknownVariant {
                            ty: stringify!($ty),
                            text: other.to_string(),
                            variants: &[$( stringify!($variant) ),+],
                        });
                    }
                };
                Ok(())
            }
        }
    };
}
