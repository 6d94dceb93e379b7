//! Scene markers for extractors.

/// Selects the schema scene an extractor validates.
///
/// Use the [`scene!`](crate::scene!) macro to declare one.
pub trait Scene: Send + Sync + 'static {
    /// Scene name, or `None` for every field.
    const NAME: Option<&'static str>;
}

/// Validates every field.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScene;

impl Scene for NoScene {
    const NAME: Option<&'static str> = None;
}

/// Declares a [`Scene`] marker type.
///
/// ```
/// verity_http::scene!(
///     /// Only the fields a profile update may touch.
///     pub ProfileUpdate = "profile"
/// );
///
/// use verity_http::Scene;
/// assert_eq!(ProfileUpdate::NAME, Some("profile"));
/// ```
#[macro_export]
macro_rules! scene {
    ($(#[$meta:meta])* $vis:vis $name:ident = $scene:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $crate::Scene for $name {
            const NAME: Option<&'static str> = Some($scene);
        }
    };
}
