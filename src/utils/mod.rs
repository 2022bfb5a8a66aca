//! Small pure helpers shared by the page renderers.

mod class_names;
mod date;
mod text;

pub use class_names::{ClassValue, merge_classes};
pub use date::{CalendarDate, format_date};
pub use text::{get_initials, truncate};

/// Merge Tailwind class lists.
///
/// Accepts `&str`, `String` and `Option` of either; `None` and empty
/// strings are dropped. When two classes set the same property, the
/// later one wins.
///
/// ```
/// use vibekit::cn;
///
/// assert_eq!(cn!("px-2 py-1", "px-4"), "py-1 px-4");
/// assert_eq!(cn!("foo", false.then_some("bar"), "baz"), "foo baz");
/// ```
#[macro_export]
macro_rules! cn {
    ($($class:expr),* $(,)?) => {
        $crate::utils::merge_classes([$($crate::utils::ClassValue::as_class(&$class)),*])
    };
}
