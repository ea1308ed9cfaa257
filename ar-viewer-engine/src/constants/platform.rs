/// User-agent tokens that select the AR Quick Look hand-off path
pub const IOS_DEVICE_TOKENS: &[&str] = &["iphone", "ipad", "ipod"];

/// Broader mobile token set, reported to the host page for its AR affordance
pub const MOBILE_DEVICE_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// WebXR session mode requested for in-page augmented reality
pub const IMMERSIVE_AR_MODE: &str = "immersive-ar";

pub const XR_REQUIRED_FEATURES: &[&str] = &["local", "hit-test"];
pub const XR_OPTIONAL_FEATURES: &[&str] = &["dom-overlay"];

/// Companion assets injected once per document by the renderer bootstrap
pub const BOOTSTRAP_SCRIPT_URL: &str = "/viewer/ar-overlay.js";
pub const BOOTSTRAP_STYLE_URL: &str = "/viewer/ar-overlay.css";
pub const BOOTSTRAP_SCRIPT_ELEMENT_ID: &str = "ar-viewer-bootstrap-script";
pub const BOOTSTRAP_STYLE_ELEMENT_ID: &str = "ar-viewer-bootstrap-style";

/// Asset-relative path of the default viewer configuration manifest
pub const VIEWER_MANIFEST_PATH: &str = "viewer.json";
