//! Display semantics for a classification label.
//!
//! Everything here is a table lookup over a closed set of labels plus one
//! fallback entry, so any label (including an absent one) has a descriptor.

/// Color, icon and guidance text for a label. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationDescriptor {
    pub color: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// A label the service is known to produce, with its result card and the
/// short entry shown in the reference guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownCondition {
    pub label: &'static str,
    pub marker: &'static str,
    pub summary: &'static str,
    pub descriptor: PresentationDescriptor,
}

const KNOWN_CONDITIONS: [KnownCondition; 3] = [
    KnownCondition {
        label: "Healthy",
        marker: "🟢",
        summary: "No disease detected. Continue regular monitoring and good agricultural practices to maintain plant health.",
        descriptor: PresentationDescriptor {
            color: "#10b981",
            icon: "✅",
            description: "This potato leaf appears to be healthy with no signs of disease. Continue regular monitoring and good agricultural practices to maintain plant health.",
        },
    },
    KnownCondition {
        label: "Early Blight",
        marker: "🟡",
        summary: "Fungal disease causing brown spots with concentric rings. Can be managed with fungicides and improved air circulation.",
        descriptor: PresentationDescriptor {
            color: "#f59e0b",
            icon: "⚠️",
            description: "Early blight detected. This fungal disease causes brown spots with concentric rings. Can be managed with fungicides and improved air circulation.",
        },
    },
    KnownCondition {
        label: "Late Blight",
        marker: "🔴",
        summary: "Serious disease causing rapid leaf death. Requires immediate treatment to prevent crop loss and spread.",
        descriptor: PresentationDescriptor {
            color: "#ef4444",
            icon: "🚨",
            description: "Late blight detected! This is a serious disease that can quickly destroy crops. Requires immediate treatment to prevent crop loss and spread.",
        },
    },
];

pub const FALLBACK: PresentationDescriptor = PresentationDescriptor {
    color: "#6b7280",
    icon: "❓",
    description: "Unable to determine disease status. Please try with a clearer image.",
};

/// Labels match exactly; "healthy", " Healthy" and the empty label (the
/// service sent no class) get the fallback.
pub fn describe(label: &str) -> PresentationDescriptor {
    KNOWN_CONDITIONS
        .iter()
        .find(|condition| condition.label == label)
        .map_or(FALLBACK, |condition| condition.descriptor)
}

pub fn known_conditions() -> &'static [KnownCondition] {
    &KNOWN_CONDITIONS
}

/// Whole-number percentage for the confidence badge.
pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

/// Fill width of the confidence bar, in percent. Not clamped.
pub fn confidence_bar_width(confidence: f64) -> f64 {
    confidence * 100.0
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
