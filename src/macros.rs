/// Expands to a doc string pointing to a section of the JVM Specification.
macro_rules! see_jvm_spec {
    ($sec:literal, $subsec:literal, $subsubsec:literal, $para:literal) => {
        concat!(
            "See the [JVM Specification §",
            $sec,
            ".",
            $subsec,
            ".",
            $subsubsec,
            ".",
            $para,
            "](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-",
            $sec,
            ".html#jvms-",
            $sec,
            ".",
            $subsec,
            ".",
            $subsubsec,
            ".",
            $para,
            ") for more information."
        )
    };
    ($sec:literal, $subsec:literal) => {
        concat!(
            "See the [JVM Specification §",
            $sec,
            ".",
            $subsec,
            "](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-",
            $sec,
            ".html#jvms-",
            $sec,
            ".",
            $subsec,
            ") for more information."
        )
    };
}

pub(crate) use see_jvm_spec;
