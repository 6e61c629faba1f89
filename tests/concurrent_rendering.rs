use rayon::prelude::*;
use typesig::types::signature::{erasure::type_erasure, render::display_string};

const SIGNATURES: [&str; 8] = [
    "[[I",
    "Ljava.util.Map<Ljava.lang.String;Ljava.util.List<+Ljava.lang.Number;>;>;",
    "Lp.Outer<TT;>.Inner<TU;>;",
    "!-Ljava.util.List<TT;>;",
    "<T:Ljava.lang.Number;>(TT;)Ljava.util.List<TT;>;^Ljava.io.IOException;^TE;",
    "<K:Ljava.lang.Object;V:>Ljava.util.AbstractMap<TK;TV;>;Ljava.util.Map<TK;TV;>;",
    "T::Ljava.lang.Comparable<TT;>;",
    "|Ljava.lang.Number;:Ljava.lang.Comparable<TT;>;",
];

#[test]
fn render_and_erase_in_parallel() {
    let expected: Vec<_> = SIGNATURES
        .iter()
        .map(|it| (display_string(it), type_erasure(it)))
        .collect();
    (0..256).into_par_iter().for_each(|round| {
        let index = round % SIGNATURES.len();
        let sig = SIGNATURES[index];
        let actual = (display_string(sig), type_erasure(sig));
        assert!(actual.0.is_ok(), "{sig}");
        assert_eq!(actual, expected[index], "{sig}");
    });
}
