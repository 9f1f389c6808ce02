use crate::cms::{parse_repeatable, relation_keys, sort_rows, CmsClient, Key, QueryOptions};
use crate::domain::icons::{Accent, Icon};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::LazyLock;

const COLLECTION: &str = "services";
const FIELDS: [&str; 8] = [
    "id",
    "title",
    "subtitle",
    "description",
    "icon",
    "features",
    "accent_color",
    "related_machinery",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub icon: Icon,
    pub features: Vec<String>,
    pub accent: Accent,
    pub related_machinery_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceRow {
    pub id: Key,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub features: Option<Value>,
    pub accent_color: Option<String>,
    pub related_machinery: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FeatureRow {
    text: String,
    sort: Option<i64>,
}

/// Features arrive either as a plain string array or as repeatable rows
/// (possibly still JSON-encoded) carrying a `sort` attribute.
fn parse_features(value: Option<&Value>) -> Vec<String> {
    if let Some(Value::Array(items)) = value {
        if items.iter().all(|item| item.is_string()) {
            return items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect();
        }
    }

    sort_rows(parse_repeatable::<FeatureRow>(value), |row| row.sort)
        .into_iter()
        .map(|row| row.text)
        .collect()
}

pub fn transform_service(row: ServiceRow) -> Service {
    Service {
        id: row.id.as_string(),
        title: row.title,
        subtitle: row.subtitle.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        icon: Icon::from_name(row.icon.as_deref()),
        features: parse_features(row.features.as_ref()),
        accent: Accent::from_name(row.accent_color.as_deref()),
        related_machinery_ids: relation_keys(row.related_machinery.as_ref()),
    }
}

/// Fetch the full services catalog; the hardcoded catalog stands in when the
/// CMS yields nothing.
pub async fn fetch_services(cms: &CmsClient) -> Vec<Service> {
    let options = QueryOptions::new()
        .fields(FIELDS)
        .filter(json!({ "status": { "_eq": "published" } }))
        .sort(["sort"]);

    let rows: Vec<ServiceRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return rows.into_iter().map(transform_service).collect();
    }

    services_fallback().clone()
}

pub async fn fetch_service_by_id(cms: &CmsClient, id: &str) -> Option<Service> {
    let options = QueryOptions::new()
        .fields(FIELDS)
        .filter(json!({ "id": { "_eq": id } }))
        .limit(1);

    let mut rows: Vec<ServiceRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return Some(transform_service(rows.remove(0)));
    }

    services_fallback().iter().find(|s| s.id == id).cloned()
}

fn service(
    id: &str,
    title: &str,
    subtitle: &str,
    description: &str,
    icon: Icon,
    features: &[&str],
    accent: Accent,
    related: &[&str],
) -> Service {
    Service {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        description: description.to_string(),
        icon,
        features: features.iter().map(|f| f.to_string()).collect(),
        accent,
        related_machinery_ids: related.iter().map(|m| m.to_string()).collect(),
    }
}

static SERVICES_FALLBACK: LazyLock<Vec<Service>> = LazyLock::new(|| {
    vec![
        service(
            "bored-piles",
            "Буронабивные сваи",
            "Bored Piles (CFA / Kelly)",
            "Устройство свай по технологиям CFA (непрерывный полый шнек), Kelly и под защитой обсадной трубы. Оптимально для плотной застройки.",
            Icon::Drill,
            &["Отсутствие опасных вибраций", "Глубина до 50 метров", "Диаметры 400-1500 мм"],
            Accent::Orange,
            &["bauer-bg28", "enteco-e400", "inteco-e6050"],
        ),
        service(
            "sheet-piling",
            "Шпунтовое ограждение",
            "Sheet Piling Works",
            "Полный комплекс работ: вибропогружение, статическое вдавливание и извлечение шпунта Ларсена. Монтаж распорных систем.",
            Icon::Layers,
            &["Вибропогружение (PVE)", "Статическое вдавливание", "Крепление котлованов"],
            Accent::Blue,
            &["giken-silent-piler", "pve-2316", "mkt-v35"],
        ),
        service(
            "sheet-pile-supply",
            "Поставка и Выкуп шпунта",
            "Supply & Buy-Back",
            "Продажа и обратный выкуп шпунта Ларсена. Аренда шпунта. Оптимизация бюджета за счет системы Buy-Back (экономия до 80%).",
            Icon::Component,
            &["Обратный выкуп (Buy-Back)", "Продажа нового и Б/У", "Аренда шпунта"],
            Accent::Orange,
            &[],
        ),
        service(
            "pile-driving",
            "Забивка свай",
            "Driven Piling",
            "Погружение железобетонных свай сечением 300x300, 350x350, 400x400 мм современными гидравлическими молотами Junttan.",
            Icon::Hammer,
            &["Сверхвысокая несущая способность", "Контроль отказа свай", "Производительность до 30 шт/смена"],
            Accent::Red,
            &["junttan-pm25"],
        ),
        service(
            "leader-drilling",
            "Лидерное бурение",
            "Leader Drilling",
            "Предварительное бурение скважин для снижения вибрационного воздействия и облегчения погружения свай в плотные грунты.",
            Icon::Anchor,
            &["Работа в мерзлых грунтах", "Снижение шума и вибрации", "Точное позиционирование"],
            Accent::Green,
            &["bauer-bg28", "enteco-e400"],
        ),
        service(
            "pile-pressing",
            "Вдавливание свай",
            "Statically Pressed Piles",
            "Бесшумное погружение свай под давлением статической нагрузки (СВУ). Идеально для работы вблизи ветхих и аварийных зданий.",
            Icon::ArrowDownCircle,
            &["Нулевая вибрация", "Работа 24/7 в городе", "Усилие до 300 тонн"],
            Accent::Purple,
            &["giken-silent-piler"],
        ),
        service(
            "jet-grouting",
            "Jet Grouting",
            "Soil Stabilization",
            "Закрепление грунтов методом струйной цементации. Создание грунтоцементных свай и массивов для усиления фундаментов.",
            Icon::Activity,
            &["Усиление фундаментов", "Противофильтрационные завесы", "Работа в стесненных условиях"],
            Accent::Cyan,
            &["enteco-e400"],
        ),
        service(
            "slurry-wall",
            "Стена в грунте",
            "Diaphragm Wall",
            "Возведение подземных сооружений и ограждающих конструкций котлованов методом «стена в грунте».",
            Icon::Shield,
            &["Глубина до 40+ метров", "Высокая водонепроницаемость", "Несущая способность"],
            Accent::Slate,
            &["bauer-bg28"],
        ),
        service(
            "vibroflotation",
            "Виброфлотация",
            "Vibroflotation",
            "Глубинное уплотнение несвязных грунтов виброустановками для повышения их несущей способности.",
            Icon::MoveVertical,
            &["Уплотнение песков", "Снижение риска разжижения", "Экономичность"],
            Accent::Yellow,
            &["pve-2316"],
        ),
        service(
            "micropiles",
            "Микросваи",
            "Micropiles & Anchors",
            "Устройство буроинъекционных свай малого диаметра и грунтовых анкеров для крепления котлованов.",
            Icon::Component,
            &["Работа внутри зданий", "Усиление склонов", "Анкерное крепление"],
            Accent::Teal,
            &["inteco-e6050"],
        ),
    ]
});

pub fn services_fallback() -> &'static Vec<Service> {
    &SERVICES_FALLBACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transform_minimal_row_is_total() {
        let row: ServiceRow =
            serde_json::from_value(json!({ "id": "jet-grouting", "title": "Jet Grouting" }))
                .unwrap();

        let service = transform_service(row);
        assert_eq!(service.id, "jet-grouting");
        assert_eq!(service.subtitle, "");
        assert_eq!(service.description, "");
        assert_eq!(service.icon, Icon::Box);
        assert!(service.features.is_empty());
        assert_eq!(service.accent, Accent::Orange);
        assert!(service.related_machinery_ids.is_empty());
    }

    #[test]
    fn test_features_plain_string_array() {
        let row: ServiceRow = serde_json::from_value(json!({
            "id": "x", "title": "X",
            "features": ["Первое", "Второе"]
        }))
        .unwrap();

        assert_eq!(transform_service(row).features, vec!["Первое", "Второе"]);
    }

    #[test]
    fn test_features_rows_are_sorted() {
        let row: ServiceRow = serde_json::from_value(json!({
            "id": "x", "title": "X",
            "features": [
                { "text": "Второе", "sort": 2 },
                { "text": "Первое", "sort": 1 },
                { "text": "Нулевое" }
            ]
        }))
        .unwrap();

        assert_eq!(
            transform_service(row).features,
            vec!["Нулевое", "Первое", "Второе"]
        );
    }

    #[test]
    fn test_features_encoded_string_and_garbage() {
        let row: ServiceRow = serde_json::from_value(json!({
            "id": "x", "title": "X",
            "features": "[{\"text\":\"Из строки\",\"sort\":1}]"
        }))
        .unwrap();
        assert_eq!(transform_service(row).features, vec!["Из строки"]);

        let row: ServiceRow = serde_json::from_value(json!({
            "id": "x", "title": "X",
            "features": "{oops"
        }))
        .unwrap();
        assert!(transform_service(row).features.is_empty());
    }

    #[test]
    fn test_fallback_catalog_ids_are_unique() {
        let services = services_fallback();
        assert_eq!(services.len(), 10);

        let mut ids: Vec<&str> = services.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), services.len());
    }
}
