use serde::{Deserialize, Serialize};

/// Rendering symbols referenced by CMS content.
///
/// The CMS stores icons as lowercase strings ("drill", "hammer"). Names are
/// resolved through [`Icon::from_name`]; an unrecognized or missing name
/// degrades to [`Icon::Box`]. When adding a new icon to the CMS dropdowns,
/// add the variant and its mapping here as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Drill,
    Layers,
    Anchor,
    Hammer,
    ArrowDownCircle,
    Activity,
    Shield,
    Construction,
    MoveVertical,
    Zap,
    Pickaxe,
    Component,
    Tractor,
    Settings,
    Clock,
    Award,
    Wrench,
    ShieldCheck,
    Cpu,
    Target,
    Users,
    Globe,
    Weight,
    Ruler,
    Box,
    Database,
    Cloud,
    FileText,
}

impl Icon {
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Icon::Box;
        };
        match name.to_ascii_lowercase().as_str() {
            "drill" => Icon::Drill,
            "layers" => Icon::Layers,
            "anchor" => Icon::Anchor,
            "hammer" => Icon::Hammer,
            "arrow-down-circle" => Icon::ArrowDownCircle,
            "activity" => Icon::Activity,
            "shield" => Icon::Shield,
            "construction" => Icon::Construction,
            "move-vertical" => Icon::MoveVertical,
            "zap" => Icon::Zap,
            "pickaxe" => Icon::Pickaxe,
            "component" => Icon::Component,
            "tractor" => Icon::Tractor,
            "settings" => Icon::Settings,
            "clock" => Icon::Clock,
            "award" => Icon::Award,
            "wrench" => Icon::Wrench,
            "shield-check" => Icon::ShieldCheck,
            "cpu" => Icon::Cpu,
            "target" => Icon::Target,
            "users" => Icon::Users,
            "globe" => Icon::Globe,
            "weight" => Icon::Weight,
            "ruler" => Icon::Ruler,
            "box" => Icon::Box,
            "database" => Icon::Database,
            "cloud" => Icon::Cloud,
            "file-text" => Icon::FileText,
            _ => Icon::Box,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Icon::Drill => "drill",
            Icon::Layers => "layers",
            Icon::Anchor => "anchor",
            Icon::Hammer => "hammer",
            Icon::ArrowDownCircle => "arrow-down-circle",
            Icon::Activity => "activity",
            Icon::Shield => "shield",
            Icon::Construction => "construction",
            Icon::MoveVertical => "move-vertical",
            Icon::Zap => "zap",
            Icon::Pickaxe => "pickaxe",
            Icon::Component => "component",
            Icon::Tractor => "tractor",
            Icon::Settings => "settings",
            Icon::Clock => "clock",
            Icon::Award => "award",
            Icon::Wrench => "wrench",
            Icon::ShieldCheck => "shield-check",
            Icon::Cpu => "cpu",
            Icon::Target => "target",
            Icon::Users => "users",
            Icon::Globe => "globe",
            Icon::Weight => "weight",
            Icon::Ruler => "ruler",
            Icon::Box => "box",
            Icon::Database => "database",
            Icon::Cloud => "cloud",
            Icon::FileText => "file-text",
        }
    }
}

/// Accent colors configurable per record in the CMS. Unknown names degrade to
/// orange, the site's primary accent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Orange,
    Blue,
    Green,
    Purple,
    Red,
    Cyan,
    Teal,
    Indigo,
    Yellow,
    Slate,
}

impl Accent {
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Accent::Orange;
        };
        match name.to_ascii_lowercase().as_str() {
            "orange" => Accent::Orange,
            "blue" => Accent::Blue,
            "green" => Accent::Green,
            "purple" => Accent::Purple,
            "red" => Accent::Red,
            "cyan" => Accent::Cyan,
            "teal" => Accent::Teal,
            "indigo" => Accent::Indigo,
            "yellow" => Accent::Yellow,
            "slate" => Accent::Slate,
            _ => Accent::Orange,
        }
    }

    fn color_name(&self) -> &'static str {
        match self {
            Accent::Orange => "orange",
            Accent::Blue => "blue",
            Accent::Green => "green",
            Accent::Purple => "purple",
            Accent::Red => "red",
            Accent::Cyan => "cyan",
            Accent::Teal => "teal",
            Accent::Indigo => "indigo",
            Accent::Yellow => "yellow",
            Accent::Slate => "slate",
        }
    }

    /// Utility class for accent-colored text.
    pub fn text_class(&self) -> String {
        format!("text-{}-500", self.color_name())
    }

    /// Utility class for the translucent accent background.
    pub fn bg_class(&self) -> String {
        format!("bg-{}-500/10", self.color_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_resolution_with_default() {
        assert_eq!(Icon::from_name(Some("drill")), Icon::Drill);
        assert_eq!(Icon::from_name(Some("Arrow-Down-Circle")), Icon::ArrowDownCircle);
        assert_eq!(Icon::from_name(Some("teleporter")), Icon::Box);
        assert_eq!(Icon::from_name(None), Icon::Box);
    }

    #[test]
    fn test_icon_name_round_trip() {
        for icon in [Icon::Drill, Icon::ShieldCheck, Icon::MoveVertical, Icon::FileText] {
            assert_eq!(Icon::from_name(Some(icon.name())), icon);
        }
    }

    #[test]
    fn test_accent_resolution_with_default() {
        assert_eq!(Accent::from_name(Some("blue")), Accent::Blue);
        assert_eq!(Accent::from_name(Some("magenta")), Accent::Orange);
        assert_eq!(Accent::from_name(None), Accent::Orange);
    }

    #[test]
    fn test_accent_classes() {
        assert_eq!(Accent::Teal.text_class(), "text-teal-500");
        assert_eq!(Accent::Teal.bg_class(), "bg-teal-500/10");
    }

    #[test]
    fn test_icon_serializes_as_kebab_case() {
        let json = serde_json::to_string(&Icon::ArrowDownCircle).unwrap();
        assert_eq!(json, "\"arrow-down-circle\"");
    }
}
