use crate::cms::{parse_repeatable, sort_rows, CmsClient, Key, QueryOptions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::LazyLock;

pub const PLACEHOLDER_IMAGE: &str = "/assets/projects/placeholder.png";

const COLLECTION: &str = "projects";
const FIELDS: [&str; 14] = [
    "id",
    "title",
    "location",
    "region",
    "category",
    "description",
    "challenge",
    "solution",
    "year",
    "latitude",
    "longitude",
    "image",
    "tags",
    "stats",
];

/// Geography buckets used by the portfolio map filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Spb,
    Msk,
    Regions,
}

impl Region {
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::to_ascii_lowercase).as_deref() {
            Some("spb") => Region::Spb,
            Some("msk") => Region::Msk,
            _ => Region::Regions,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Spb => "spb",
            Region::Msk => "msk",
            Region::Regions => "regions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Industrial,
    Civil,
    Infrastructure,
    Marine,
}

impl ProjectCategory {
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::to_ascii_lowercase).as_deref() {
            Some("industrial") => ProjectCategory::Industrial,
            Some("infrastructure") => ProjectCategory::Infrastructure,
            Some("marine") => ProjectCategory::Marine,
            _ => ProjectCategory::Civil,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub location: String,
    pub region: Region,
    pub category: ProjectCategory,
    pub description: String,
    pub challenge: String,
    pub solution: String,
    pub year: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image: String,
    pub tags: Vec<String>,
    pub stats: Vec<ProjectStat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectRow {
    pub id: Key,
    pub title: String,
    pub location: Option<String>,
    pub region: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub challenge: Option<String>,
    pub solution: Option<String>,
    pub year: Option<Value>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image: Option<String>,
    pub tags: Option<Value>,
    pub stats: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct StatRow {
    label: String,
    value: String,
    sort: Option<i64>,
}

fn stringify(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

pub fn transform_project(cms: &CmsClient, row: ProjectRow) -> Project {
    let stats = sort_rows(parse_repeatable::<StatRow>(row.stats.as_ref()), |r| r.sort)
        .into_iter()
        .map(|stat| ProjectStat {
            label: stat.label,
            value: stat.value,
        })
        .collect();

    Project {
        id: row.id.as_string(),
        title: row.title,
        location: row.location.unwrap_or_default(),
        region: Region::from_name(row.region.as_deref()),
        category: ProjectCategory::from_name(row.category.as_deref()),
        description: row.description.unwrap_or_default(),
        challenge: row.challenge.unwrap_or_default(),
        solution: row.solution.unwrap_or_default(),
        year: stringify(row.year.as_ref()),
        latitude: row.latitude.unwrap_or_default(),
        longitude: row.longitude.unwrap_or_default(),
        image: cms
            .file_url(row.image.as_deref())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        tags: parse_repeatable::<String>(row.tags.as_ref()),
        stats,
    }
}

/// Fetch the reference projects, newest first, optionally limited to a
/// region. Degrades to the hardcoded case studies.
pub async fn fetch_projects(cms: &CmsClient, region: Option<Region>) -> Vec<Project> {
    let mut filter = json!({ "status": { "_eq": "published" } });
    if let Some(region) = region {
        filter["region"] = json!({ "_eq": region.name() });
    }

    let options = QueryOptions::new()
        .fields(FIELDS)
        .filter(filter)
        .sort(["-year", "title"]);

    let rows: Vec<ProjectRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return rows
            .into_iter()
            .map(|row| transform_project(cms, row))
            .collect();
    }

    let mut fallback = projects_fallback().clone();
    if let Some(region) = region {
        fallback.retain(|p| p.region == region);
    }
    fallback
}

pub async fn fetch_project_by_id(cms: &CmsClient, id: &str) -> Option<Project> {
    let options = QueryOptions::new()
        .fields(FIELDS)
        .filter(json!({ "id": { "_eq": id } }))
        .limit(1);

    let mut rows: Vec<ProjectRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return Some(transform_project(cms, rows.remove(0)));
    }

    projects_fallback().iter().find(|p| p.id == id).cloned()
}

struct ProjectSeed {
    id: &'static str,
    title: &'static str,
    location: &'static str,
    region: Region,
    category: ProjectCategory,
    description: &'static str,
    challenge: &'static str,
    solution: &'static str,
    year: &'static str,
    latitude: f64,
    longitude: f64,
    image: &'static str,
    tags: &'static [&'static str],
    stats: &'static [(&'static str, &'static str)],
}

impl ProjectSeed {
    fn build(&self) -> Project {
        Project {
            id: self.id.to_string(),
            title: self.title.to_string(),
            location: self.location.to_string(),
            region: self.region,
            category: self.category,
            description: self.description.to_string(),
            challenge: self.challenge.to_string(),
            solution: self.solution.to_string(),
            year: self.year.to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            image: self.image.to_string(),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            stats: self
                .stats
                .iter()
                .map(|(label, value)| ProjectStat {
                    label: label.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

static PROJECTS_FALLBACK: LazyLock<Vec<Project>> = LazyLock::new(|| {
    [
        ProjectSeed {
            id: "lakhta-2",
            title: "МФК «Лахта Центр 2»",
            location: "Санкт-Петербург",
            region: Region::Spb,
            category: ProjectCategory::Civil,
            description: "Устройство шпунтового ограждения котлована для второго небоскреба в условиях плотной застройки и сложных грунтов.",
            challenge: "Нулевые допуски по вибрации из-за близости существующей башни и исторических зданий.",
            solution: "Использование технологии статического вдавливания Giken Silent Piler. Погружение шпунта длиной 24 метра без резонансных колебаний.",
            year: "2024",
            latitude: 59.98,
            longitude: 30.17,
            image: "/assets/projects/lakhta.png",
            tags: &["Giken Silent Piler", "Шпунт Ларсена", "Нулевой цикл"],
            stats: &[("Глубина", "24 м"), ("Шпунт", "1,200 т"), ("Срок", "3 мес")],
        },
        ProjectSeed {
            id: "moscow-city",
            title: "ЖК «High Life» (Москва-Сити)",
            location: "Москва",
            region: Region::Msk,
            category: ProjectCategory::Civil,
            description: "Комплекс работ по устройству «стены в грунте» и буросекущих свай для многоуровневого подземного паркинга.",
            challenge: "Стесненные условия мегаполиса, необходимость работы в режиме 24/7 для соблюдения жесткого графика.",
            solution: "Мобилизация двух установок Bauer BG. Устройство свайного поля диаметром 800мм в рекордные сроки.",
            year: "2023",
            latitude: 55.75,
            longitude: 37.54,
            image: "/assets/projects/moscow-city.png",
            tags: &["Bauer BG", "Буросекущие сваи", "Котлован"],
            stats: &[("Сваи", "450 шт"), ("Диаметр", "800 мм"), ("Бетон", "15,000 м³")],
        },
        ProjectSeed {
            id: "ust-luga",
            title: "Терминал СПГ «Усть-Луга»",
            location: "Ленинградская обл.",
            region: Region::Regions,
            category: ProjectCategory::Marine,
            description: "Берегоукрепление и устройство причальной стенки для нового терминала сжиженного газа.",
            challenge: "Работа в прибрежной зоне, сложные гидрогеологические условия, высокие ветровые нагрузки.",
            solution: "Вибропогружение трубчатого шпунта большого диаметра с использованием тяжелых вибропогружателей PVE.",
            year: "2023",
            latitude: 59.68,
            longitude: 28.42,
            image: "/assets/projects/ust-luga.png",
            tags: &["Трубчатый шпунт", "Вибропогружение", "Гидротехника"],
            stats: &[("Шпунт", "3,500 т"), ("Длина", "До 32 м"), ("Линия", "450 п.м.")],
        },
        ProjectSeed {
            id: "kazan-eco",
            title: "Эко-Технопарк «Волга»",
            location: "Казань",
            region: Region::Regions,
            category: ProjectCategory::Industrial,
            description: "Фундаментные работы для промышленного комплекса переработки отходов.",
            challenge: "Неоднородные грунты с включениями скальных пород. Требование высокой несущей способности.",
            solution: "Лидерное бурение с последующим погружением забивных ЖБ свай сечением 400х400мм.",
            year: "2022",
            latitude: 55.79,
            longitude: 49.12,
            image: "/assets/projects/kazan.png",
            tags: &["Забивные сваи", "Лидерное бурение", "Фундамент"],
            stats: &[("Сваи", "1,100 шт"), ("Сечение", "400 мм"), ("Нагрузка", "80 т")],
        },
        ProjectSeed {
            id: "taman-port",
            title: "Морской Порт «Тамань»",
            location: "Краснодарский край",
            region: Region::Regions,
            category: ProjectCategory::Marine,
            description: "Реконструкция грузовых причалов. Погружение шпунта в условиях открытой акватории.",
            challenge: "Коррозионная агрессивность среды, работа с плавсредств (баржи).",
            solution: "Применение шпунта с антикоррозийным покрытием. Высокоточная забивка с использованием GPS-позиционирования.",
            year: "2022",
            latitude: 45.13,
            longitude: 36.68,
            image: "/assets/projects/taman.png",
            tags: &["Шпунт Ларсена", "Плавкран", "Порт"],
            stats: &[("Шпунт", "800 т"), ("Глубина", "18 м"), ("Защита", "Эпоксид")],
        },
    ]
    .iter()
    .map(ProjectSeed::build)
    .collect()
});

pub fn projects_fallback() -> &'static Vec<Project> {
    &PROJECTS_FALLBACK
}
