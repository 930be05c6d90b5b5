// Icon selection by keyword match
//
// The original UI picked a lucide icon per row by scanning the title for
// keywords. Same idea here: an ordered rule table, first match wins, with a
// flow-based fallback (briefcase for money in, utensils for money out).

use crate::model::Flow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Briefcase,
    Utensils,
    Home,
    Car,
    Cart,
    Heart,
    Shield,
    Zap,
    Gift,
}

impl Icon {
    /// Terminal glyph for the TUI row
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Briefcase => "💼",
            Icon::Utensils => "🍽",
            Icon::Home => "🏠",
            Icon::Car => "🚗",
            Icon::Cart => "🛒",
            Icon::Heart => "❤",
            Icon::Shield => "🛡",
            Icon::Zap => "⚡",
            Icon::Gift => "🎁",
        }
    }
}

// First match wins, so more specific keywords come first
const RULES: &[(&[&str], Icon)] = &[
    (&["salary", "wage", "pay", "bonus"], Icon::Briefcase),
    (&["rent", "house", "mortgage"], Icon::Home),
    (&["grocer", "market", "shopping"], Icon::Cart),
    (&["food", "lunch", "dinner", "restaurant", "eat"], Icon::Utensils),
    (&["fuel", "transport", "uber", "taxi", "bus"], Icon::Car),
    (&["electric", "power", "nepa", "utility"], Icon::Zap),
    (&["health", "hospital", "medic", "pharm"], Icon::Heart),
    (&["insurance", "premium"], Icon::Shield),
    (&["gift", "present", "donat"], Icon::Gift),
];

/// Pick an icon for a ledger row from its title, falling back by flow
pub fn icon_for(title: &str, flow: Flow) -> Icon {
    let haystack = title.to_lowercase();

    for (keywords, icon) in RULES {
        if keywords.iter().any(|kw| haystack.contains(kw)) {
            return *icon;
        }
    }

    match flow {
        Flow::In => Icon::Briefcase,
        Flow::Out => Icon::Utensils,
    }
}

// ============================================================================
// TESTS
// ============================================================================
