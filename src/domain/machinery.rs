use crate::cms::{parse_repeatable, relation_keys, sort_rows, CmsClient, Key, QueryOptions, Relation};
use crate::domain::icons::{Accent, Icon};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::LazyLock;

pub const PLACEHOLDER_IMAGE: &str = "/images/machinery/placeholder.png";

const COLLECTION: &str = "machinery";
const FIELDS: [&str; 9] = [
    "id",
    "name",
    "category.id",
    "category_label",
    "description",
    "specs",
    "image",
    "accent_color",
    "related_services",
];

// ──────────────────────────────────────────────
// Frontend shape
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachinerySpec {
    pub label: String,
    pub value: String,
    pub icon: Icon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machinery {
    pub id: String,
    pub name: String,
    pub category: String,
    pub category_label: String,
    pub description: String,
    pub specs: Vec<MachinerySpec>,
    pub image: String,
    pub accent: Accent,
    pub related_service_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineryCategory {
    pub id: String,
    pub label: String,
    pub icon: Icon,
}

// ──────────────────────────────────────────────
// CMS shape
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MachineryRow {
    pub id: Key,
    pub name: String,
    pub category: Option<Relation<CategoryRow>>,
    pub category_label: Option<String>,
    pub description: Option<String>,
    pub specs: Option<Value>,
    pub image: Option<String>,
    pub accent_color: Option<String>,
    pub related_services: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRow {
    pub id: Key,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SpecRow {
    label: String,
    value: String,
    icon: Option<String>,
    sort: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CategoryListRow {
    id: Key,
    label: String,
    icon: Option<String>,
}

// ──────────────────────────────────────────────
// Transform
// ──────────────────────────────────────────────

pub fn transform_machinery(cms: &CmsClient, row: MachineryRow) -> Machinery {
    let category = match &row.category {
        Some(Relation::Resolved(c)) => c.id.as_string(),
        Some(Relation::Unresolved(key)) => key.as_string(),
        None => String::new(),
    };

    let specs = sort_rows(parse_repeatable::<SpecRow>(row.specs.as_ref()), |r| r.sort)
        .into_iter()
        .map(|spec| MachinerySpec {
            label: spec.label,
            value: spec.value,
            icon: Icon::from_name(spec.icon.as_deref()),
        })
        .collect();

    Machinery {
        id: row.id.as_string(),
        name: row.name,
        category,
        category_label: row.category_label.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        specs,
        image: cms
            .file_url(row.image.as_deref())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        accent: Accent::from_name(row.accent_color.as_deref()),
        related_service_ids: relation_keys(row.related_services.as_ref()),
    }
}

// ──────────────────────────────────────────────
// Fetch (with fallback)
// ──────────────────────────────────────────────

/// Fetch the machinery park, optionally narrowed to one category id.
/// Falls back to the hardcoded park when the CMS yields nothing.
pub async fn fetch_machinery(cms: &CmsClient, category: Option<&str>) -> Vec<Machinery> {
    let mut filter = json!({ "status": { "_eq": "published" } });
    if let Some(category) = active_category(category) {
        filter["category"] = json!({ "_eq": category });
    }

    let options = QueryOptions::new()
        .fields(FIELDS)
        .filter(filter)
        .sort(["sort"]);

    let rows: Vec<MachineryRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return rows
            .into_iter()
            .map(|row| transform_machinery(cms, row))
            .collect();
    }

    let mut fallback = machinery_fallback().clone();
    if let Some(category) = active_category(category) {
        fallback.retain(|m| m.category == category);
    }
    fallback
}

/// Fetch one machine by id, searching the fallback park when the CMS yields
/// nothing. `None` when the id is absent from both sources.
pub async fn fetch_machinery_by_id(cms: &CmsClient, id: &str) -> Option<Machinery> {
    let options = QueryOptions::new()
        .fields(FIELDS)
        .filter(json!({ "id": { "_eq": id } }))
        .limit(1);

    let mut rows: Vec<MachineryRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return Some(transform_machinery(cms, rows.remove(0)));
    }

    machinery_fallback().iter().find(|m| m.id == id).cloned()
}

/// Fetch the category filter list shown above the catalog.
pub async fn fetch_machinery_categories(cms: &CmsClient) -> Vec<MachineryCategory> {
    let options = QueryOptions::new()
        .fields(["id", "label", "icon"])
        .sort(["sort"]);

    let rows: Vec<CategoryListRow> = cms.fetch_items("machinery_categories", &options).await;
    if !rows.is_empty() {
        return rows
            .into_iter()
            .map(|row| MachineryCategory {
                id: row.id.as_string(),
                label: row.label,
                icon: Icon::from_name(row.icon.as_deref()),
            })
            .collect();
    }

    categories_fallback().clone()
}

fn active_category(category: Option<&str>) -> Option<&str> {
    category.filter(|c| *c != "all" && !c.is_empty())
}

// ──────────────────────────────────────────────
// Fallback datasets
// ──────────────────────────────────────────────

fn spec(label: &str, value: &str, icon: Icon) -> MachinerySpec {
    MachinerySpec {
        label: label.to_string(),
        value: value.to_string(),
        icon,
    }
}

fn machine(
    id: &str,
    name: &str,
    category: &str,
    category_label: &str,
    description: &str,
    specs: Vec<MachinerySpec>,
    image: &str,
    accent: Accent,
    related: &[&str],
) -> Machinery {
    Machinery {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        category_label: category_label.to_string(),
        description: description.to_string(),
        specs,
        image: image.to_string(),
        accent,
        related_service_ids: related.iter().map(|s| s.to_string()).collect(),
    }
}

static MACHINERY_FALLBACK: LazyLock<Vec<Machinery>> = LazyLock::new(|| {
    vec![
        machine(
            "bauer-bg28",
            "Bauer BG 28",
            "drilling",
            "Буровая установка",
            "Тяжелая буровая установка для устройства свай большого диаметра до 2500 мм и глубиной до 70 метров. Идеальна для Kelly-бурения.",
            vec![
                spec("Крутящий момент", "270 кНм", Icon::Zap),
                spec("Масса установки", "96 тонн", Icon::Weight),
                spec("Глубина бурения", "71 метр", Icon::Ruler),
            ],
            "/images/machinery/bauer_bg28.png",
            Accent::Orange,
            &["bored-piles", "slurry-wall", "leader-drilling"],
        ),
        machine(
            "enteco-e400",
            "Enteco E400",
            "drilling",
            "Буровая установка",
            "Универсальная установка для CFA бурения и устройства буронабивных свай. Высокая маневренность на средних объектах.",
            vec![
                spec("Крутящий момент", "240 кНм", Icon::Zap),
                spec("Масса установки", "75 тонн", Icon::Weight),
                spec("CFA Глубина", "24-28 м", Icon::Ruler),
            ],
            "/images/machinery/enteco_e400.png",
            Accent::Blue,
            &["bored-piles", "jet-grouting", "leader-drilling"],
        ),
        machine(
            "junttan-pm25",
            "Junttan PM 25",
            "piling",
            "Сваебойный копер",
            "Специализированный копер для забивки ЖБ свай. Гидравлическая система обеспечивает точный контроль энергии удара.",
            vec![
                spec("Энергия удара", "115 кДж", Icon::Zap),
                spec("Длина сваи", "16 метров", Icon::Ruler),
                spec("Масса молота", "7 тонн", Icon::Weight),
            ],
            "/images/machinery/junttan_pm25.png",
            Accent::Red,
            &["pile-driving"],
        ),
        machine(
            "bsp-356",
            "BSP 356-9",
            "piling",
            "Гидромолот",
            "Навесной гидравлический молот большой мощности для работы с крана. Эффективен для стальных труб и оболочек.",
            vec![
                spec("Энергия макс.", "125 кДж", Icon::Zap),
                spec("Масса ударника", "9 тонн", Icon::Weight),
                spec("Частота", "40-100 уд/м", Icon::Ruler),
            ],
            "/images/machinery/bsp_356.png",
            Accent::Yellow,
            &["pile-driving", "sheet-piling"],
        ),
        machine(
            "giken-silent-piler",
            "Giken Silent Piler",
            "auxiliary",
            "Вдавливающая установка",
            "Бесшумное погружение шпунта Ларсена. Работает по принципу реактивного усилия, не создавая вибраций.",
            vec![
                spec("Усилие", "1500 кН", Icon::Zap),
                spec("Масса", "12.5 тонн", Icon::Weight),
                spec("Шумность", "68 дБ(А)", Icon::Ruler),
            ],
            "/images/machinery/giken_silent_piler.png",
            Accent::Green,
            &["sheet-piling", "pile-pressing"],
        ),
        machine(
            "pve-2316",
            "PVE 2316 VM",
            "auxiliary",
            "Вибропогружатель",
            "Высокочастотный вибропогружатель с переменным статическим моментом. Безопасен для городской застройки.",
            vec![
                spec("Стат. момент", "0-23 кгм", Icon::Zap),
                spec("Центроб. сила", "1150 кН", Icon::Weight),
                spec("Амплитуда", "16 мм", Icon::Ruler),
            ],
            "/images/machinery/pve_2316.png",
            Accent::Purple,
            &["sheet-piling", "vibroflotation"],
        ),
        machine(
            "manitowoc-222",
            "Manitowoc 222",
            "auxiliary",
            "Гусеничный кран",
            "Надежный гусеничный кран для вспомогательных работ на стройплощадке и погружения шпунта с вибропогружателем.",
            vec![
                spec("Грузоподъем.", "100 тонн", Icon::Weight),
                spec("Длина стрелы", "61 метр", Icon::Ruler),
                spec("Скорость", "1.5 км/ч", Icon::Zap),
            ],
            "/images/machinery/manitowoc_222.png",
            Accent::Teal,
            &["sheet-piling", "bored-piles"],
        ),
        machine(
            "inteco-e6050",
            "Inteco E6050",
            "drilling",
            "Буровая установка",
            "Компактная и мощная буровая установка итальянского производства для работы в ограниченном пространстве.",
            vec![
                spec("Крутящий момент", "60 кНм", Icon::Zap),
                spec("Масса", "18.5 тонн", Icon::Weight),
                spec("Ширина базы", "2.3 м", Icon::Ruler),
            ],
            "/images/machinery/inteco_e6050.png",
            Accent::Indigo,
            &["micropiles", "leader-drilling"],
        ),
    ]
});

static CATEGORIES_FALLBACK: LazyLock<Vec<MachineryCategory>> = LazyLock::new(|| {
    vec![
        MachineryCategory {
            id: "all".to_string(),
            label: "Вся техника".to_string(),
            icon: Icon::Tractor,
        },
        MachineryCategory {
            id: "drilling".to_string(),
            label: "Буровые".to_string(),
            icon: Icon::Drill,
        },
        MachineryCategory {
            id: "piling".to_string(),
            label: "Сваебойные".to_string(),
            icon: Icon::Hammer,
        },
        MachineryCategory {
            id: "auxiliary".to_string(),
            label: "Вспомогательная".to_string(),
            icon: Icon::Settings,
        },
    ]
});

pub fn machinery_fallback() -> &'static Vec<Machinery> {
    &MACHINERY_FALLBACK
}

pub fn categories_fallback() -> &'static Vec<MachineryCategory> {
    &CATEGORIES_FALLBACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn offline_cms() -> CmsClient {
        CmsClient::with_base_url("http://geotech_cms:8055")
    }

    #[test]
    fn test_transform_minimal_row_is_total() {
        let row: MachineryRow = serde_json::from_value(json!({ "id": 1, "name": "Безымянная" }))
            .expect("minimal row must deserialize");

        let machinery = transform_machinery(&offline_cms(), row);
        assert_eq!(machinery.id, "1");
        assert_eq!(machinery.name, "Безымянная");
        assert_eq!(machinery.category, "");
        assert_eq!(machinery.category_label, "");
        assert_eq!(machinery.description, "");
        assert!(machinery.specs.is_empty());
        assert_eq!(machinery.image, PLACEHOLDER_IMAGE);
        assert_eq!(machinery.accent, Accent::Orange);
        assert!(machinery.related_service_ids.is_empty());
    }

    #[test]
    fn test_transform_orders_spec_rows() {
        let row: MachineryRow = serde_json::from_value(json!({
            "id": "bg28",
            "name": "Bauer BG 28",
            "specs": [
                { "label": "Глубина", "value": "71 метр", "icon": "ruler", "sort": 3 },
                { "label": "Крутящий момент", "value": "270 кНм", "icon": "zap", "sort": 1 },
                { "label": "Масса", "value": "96 тонн", "icon": "weight" }
            ]
        }))
        .unwrap();

        let machinery = transform_machinery(&offline_cms(), row);
        let labels: Vec<&str> = machinery.specs.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Масса", "Крутящий момент", "Глубина"]);
        assert_eq!(machinery.specs[0].icon, Icon::Weight);
    }

    #[test]
    fn test_transform_specs_from_json_string() {
        let row: MachineryRow = serde_json::from_value(json!({
            "id": "bg28",
            "name": "Bauer BG 28",
            "specs": "[{\"label\":\"Масса\",\"value\":\"96 тонн\",\"icon\":\"weight\"}]"
        }))
        .unwrap();

        let machinery = transform_machinery(&offline_cms(), row);
        assert_eq!(machinery.specs.len(), 1);

        // A corrupt encoded value degrades to no specs, never an error.
        let row: MachineryRow = serde_json::from_value(json!({
            "id": "bg28",
            "name": "Bauer BG 28",
            "specs": "{broken"
        }))
        .unwrap();
        assert!(transform_machinery(&offline_cms(), row).specs.is_empty());
    }

    #[test]
    fn test_transform_category_relation_both_shapes() {
        let bare: MachineryRow = serde_json::from_value(json!({
            "id": 1, "name": "X", "category": "drilling"
        }))
        .unwrap();
        assert_eq!(transform_machinery(&offline_cms(), bare).category, "drilling");

        let expanded: MachineryRow = serde_json::from_value(json!({
            "id": 1, "name": "X", "category": { "id": "drilling", "label": "Буровые" }
        }))
        .unwrap();
        assert_eq!(
            transform_machinery(&offline_cms(), expanded).category,
            "drilling"
        );
    }

    #[test]
    fn test_fallback_park_is_consistent() {
        let park = machinery_fallback();
        assert_eq!(park.len(), 8);
        assert!(park.iter().all(|m| !m.specs.is_empty()));

        let categories: Vec<&str> = categories_fallback()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        for machine in park.iter() {
            assert!(categories.contains(&machine.category.as_str()));
        }
    }
}
