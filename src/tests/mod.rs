use proptest::prelude::*;

use crate::types::{base_type::BaseType, signature::Resolution};

pub(crate) fn arb_identifier() -> impl Strategy<Value = String> {
    prop::string::string_regex(r"[a-zA-Z][a-zA-Z0-9_$]{0,7}").expect("The regex is invalid")
}

pub(crate) fn arb_class_name() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_identifier(), 1..5).prop_map(|v| v.join("."))
}

pub(crate) fn arb_value_base_type() -> impl Strategy<Value = BaseType> {
    any::<BaseType>().prop_filter("void is not a value type", |it| !it.is_void())
}

fn arb_type_argument(inner: BoxedStrategy<String>) -> impl Strategy<Value = String> {
    prop_oneof![
        3 => inner.clone(),
        1 => Just("*".to_owned()),
        1 => inner.clone().prop_map(|it| format!("+{it}")),
        1 => inner.prop_map(|it| format!("-{it}")),
    ]
}

prop_compose! {
    fn arb_raw_class_type()(
        resolution in any::<Resolution>(),
        name in arb_class_name(),
    ) -> String {
        format!("{}{name};", resolution.sigil())
    }
}

/// Type signatures other than arrays.
pub(crate) fn arb_element_signature() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        arb_value_base_type().prop_map(|it| it.descriptor().to_string()),
        arb_raw_class_type(),
        arb_identifier().prop_map(|it| format!("T{it};")),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        let inner = inner.boxed();
        prop_oneof![
            (
                any::<Resolution>(),
                arb_class_name(),
                prop::collection::vec(arb_type_argument(inner.clone()), 1..4),
                prop::collection::vec(
                    (
                        arb_identifier(),
                        prop::option::of(prop::collection::vec(
                            arb_type_argument(inner.clone()),
                            1..3
                        )),
                    ),
                    0..2
                ),
            )
                .prop_map(|(resolution, name, arguments, members)| {
                    let mut sig = format!("{}{name}<{}>", resolution.sigil(), arguments.concat());
                    for (member, arguments) in members {
                        sig.push('.');
                        sig.push_str(&member);
                        if let Some(arguments) = arguments {
                            sig.push_str(&format!("<{}>", arguments.concat()));
                        }
                    }
                    sig.push(';');
                    sig
                }),
            prop::collection::vec(inner.clone(), 1..4)
                .prop_map(|bounds| format!("|{}", bounds.join(":"))),
            (
                (1..=3usize),
                inner.clone().prop_filter("arrays are folded", |it| !it.starts_with('[')),
            )
                .prop_map(|(dimensions, element)| format!("{}{element}", "[".repeat(dimensions))),
        ]
    })
}

/// Any type signature, `void` excluded.
pub(crate) fn arb_type_signature() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_element_signature(),
        1 => (
            1..=4usize,
            arb_element_signature().prop_filter("arrays are folded", |it| !it.starts_with('[')),
        )
            .prop_map(|(dimensions, element)| format!("{}{element}", "[".repeat(dimensions))),
    ]
}

/// Type signatures that are neither arrays nor intersections.
pub(crate) fn arb_non_array_signature() -> impl Strategy<Value = String> {
    arb_element_signature().prop_filter("arrays and intersections are excluded", |it| {
        !it.starts_with('[') && !it.starts_with('|')
    })
}

/// Type signatures that do not swallow a following `:`-separated bound.
pub(crate) fn arb_bound_signature() -> impl Strategy<Value = String> {
    arb_type_signature().prop_filter("intersections take every following bound", |it| {
        !it.trim_start_matches('[').starts_with('|')
    })
}

/// Bounds of a formal type parameter. A bare primitive such as `I` followed by `:` reads as the
/// name of the next parameter.
fn arb_type_parameter_bound() -> impl Strategy<Value = String> {
    arb_bound_signature().prop_filter("primitive bounds", |it| it.len() > 1)
}

prop_compose! {
    pub(crate) fn arb_type_parameter()(
        name in arb_identifier(),
        class_bound in prop::option::of(arb_type_parameter_bound()),
        interface_bounds in prop::collection::vec(arb_type_parameter_bound(), 0..3),
    ) -> String {
        let mut sig = format!("{name}:{}", class_bound.unwrap_or_default());
        for bound in interface_bounds {
            sig.push(':');
            sig.push_str(&bound);
        }
        sig
    }
}

prop_compose! {
    pub(crate) fn arb_method_signature()(
        type_parameters in prop::collection::vec(arb_type_parameter(), 0..3),
        parameters in prop::collection::vec(arb_type_signature(), 0..6),
        return_type in prop_oneof![1 => Just("V".to_owned()), 3 => arb_type_signature()],
        thrown in prop::collection::vec(arb_type_signature(), 0..3),
    ) -> String {
        let type_parameters = if type_parameters.is_empty() {
            String::new()
        } else {
            format!("<{}>", type_parameters.concat())
        };
        let thrown: String = thrown.iter().map(|it| format!("^{it}")).collect();
        format!("{type_parameters}({}){return_type}{thrown}", parameters.concat())
    }
}
