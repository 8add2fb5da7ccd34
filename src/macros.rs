macro_rules! see_jvm_spec {
    ($chapter:literal, $section:literal $(, $sub:literal)*) => {
        concat!(
            "See the [JVM Specification §",
            $chapter, ".", $section, $(".", $sub,)*
            "](https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-",
            $chapter,
            ".html#jvms-",
            $chapter, ".", $section, $(".", $sub,)*
            ") for more information."
        )
    };
}

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    };
}

macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    };
}

pub(crate) use debug_event;
pub(crate) use see_jvm_spec;
pub(crate) use trace_event;
