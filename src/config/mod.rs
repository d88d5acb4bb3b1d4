mod settings;

pub use settings::{FeedbackSettings, Settings, StoreSettings, ToastSettings};
