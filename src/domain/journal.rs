use crate::cms::{CmsClient, Key, QueryOptions, Relation};
use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::LazyLock;

const COLLECTION: &str = "articles";
const CATEGORIES_COLLECTION: &str = "article_categories";
const FIELDS: [&str; 12] = [
    "id",
    "title",
    "slug",
    "excerpt",
    "content",
    "category.name",
    "date_published",
    "read_time",
    "author",
    "image",
    "seo_title",
    "seo_description",
];

/// Pseudo-category shown first in every filter bar; selecting it disables
/// category filtering.
pub const ALL_CATEGORIES: &str = "Все";

const DEFAULT_CATEGORY: &str = "Без категории";

const PLACEHOLDER_IMAGES: [&str; 3] = [
    "/assets/journal-ai.png",
    "/assets/journal-geology.png",
    "/assets/static_piling_expert.png",
];

const MONTHS_SHORT: [&str; 12] = [
    "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seo {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub date: String,
    pub read_time: String,
    pub author: String,
    pub image: String,
    pub seo: Option<Seo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArticleRow {
    pub id: Key,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub category: Option<Relation<CategoryRef>>,
    pub date_published: Option<String>,
    pub read_time: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryRef {
    pub name: String,
}

/// Render an ISO timestamp or date as the short Russian form used across the
/// journal ("12 Фев 2026"). Unparseable input is passed through untouched.
fn format_date(raw: &str) -> String {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));

    match date {
        Ok(date) => {
            let month = MONTHS_SHORT[date.month0() as usize];
            format!("{} {} {}", date.day(), month, date.year())
        }
        Err(_) => raw.to_string(),
    }
}

pub fn transform_article(cms: &CmsClient, row: ArticleRow) -> Article {
    let category = match row.category {
        Some(Relation::Resolved(category)) if !category.name.is_empty() => category.name,
        _ => DEFAULT_CATEGORY.to_string(),
    };

    let placeholder = PLACEHOLDER_IMAGES[row.id.as_index() % PLACEHOLDER_IMAGES.len()];

    let seo = match (row.seo_title, row.seo_description) {
        (None, None) => None,
        (title, description) => Some(Seo {
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
        }),
    };

    Article {
        id: row.id.as_string(),
        title: row.title,
        slug: row.slug,
        excerpt: row.excerpt.unwrap_or_default(),
        content: row.content.unwrap_or_default(),
        category,
        date: row.date_published.as_deref().map(format_date).unwrap_or_default(),
        read_time: row.read_time.unwrap_or_default(),
        author: row.author.unwrap_or_default(),
        image: cms
            .file_url(row.image.as_deref())
            .unwrap_or_else(|| placeholder.to_string()),
        seo,
    }
}

/// Filtering knobs for article listings. The default asks for everything.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    pub limit: Option<u32>,
    pub category: Option<String>,
}

fn category_filter(query: &ArticleQuery) -> Option<&str> {
    query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
}

/// Fetch published articles, newest first. Degrades to the built-in journal
/// entries, to which the same category and limit rules apply.
pub async fn fetch_articles(cms: &CmsClient, query: &ArticleQuery) -> Vec<Article> {
    let mut filter = json!({ "status": { "_eq": "published" } });
    if let Some(category) = category_filter(query) {
        filter["category"] = json!({ "name": { "_eq": category } });
    }

    let mut options = QueryOptions::new()
        .fields(FIELDS)
        .filter(filter)
        .sort(["-date_published"]);
    if let Some(limit) = query.limit {
        options = options.limit(limit);
    }

    let rows: Vec<ArticleRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return rows
            .into_iter()
            .map(|row| transform_article(cms, row))
            .collect();
    }

    let mut fallback = articles_fallback().clone();
    if let Some(category) = category_filter(query) {
        fallback.retain(|a| a.category == category);
    }
    if let Some(limit) = query.limit {
        fallback.truncate(limit as usize);
    }
    fallback
}

pub async fn fetch_article_by_slug(cms: &CmsClient, slug: &str) -> Option<Article> {
    let options = QueryOptions::new()
        .fields(FIELDS)
        .filter(json!({
            "slug": { "_eq": slug },
            "status": { "_eq": "published" }
        }))
        .limit(1);

    let mut rows: Vec<ArticleRow> = cms.fetch_items(COLLECTION, &options).await;
    if !rows.is_empty() {
        return Some(transform_article(cms, rows.remove(0)));
    }

    articles_fallback().iter().find(|a| a.slug == slug).cloned()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CategoryRow {
    name: String,
}

/// Category names for the journal filter bar, always headed by the
/// all-categories entry.
pub async fn fetch_article_categories(cms: &CmsClient) -> Vec<String> {
    let options = QueryOptions::new().fields(["name"]).sort(["sort"]);

    let rows: Vec<CategoryRow> = cms.fetch_items(CATEGORIES_COLLECTION, &options).await;
    if !rows.is_empty() {
        let mut names = vec![ALL_CATEGORIES.to_string()];
        names.extend(rows.into_iter().map(|row| row.name));
        return names;
    }

    article_categories_fallback().clone()
}

struct ArticleSeed {
    id: &'static str,
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
    category: &'static str,
    date: &'static str,
    read_time: &'static str,
    author: &'static str,
    image: &'static str,
}

impl ArticleSeed {
    fn build(&self) -> Article {
        Article {
            id: self.id.to_string(),
            title: self.title.to_string(),
            slug: self.slug.to_string(),
            excerpt: self.excerpt.to_string(),
            content: self.content.to_string(),
            category: self.category.to_string(),
            date: self.date.to_string(),
            read_time: self.read_time.to_string(),
            author: self.author.to_string(),
            image: self.image.to_string(),
            seo: None,
        }
    }
}

static ARTICLES_FALLBACK: LazyLock<Vec<Article>> = LazyLock::new(|| {
    [
        ArticleSeed {
            id: "1",
            title: "ИИ в геотехнике: как нейросети считают смету за 60 секунд",
            slug: "ai-v-geotekhnike",
            excerpt: "Разбираем, как машинное обучение анализирует геологические изыскания и подбирает технику точнее опытного инженера-сметчика.",
            content: "<p>Традиционный расчет стоимости свайных работ занимает от трех дней до двух недель. Инженер изучает отчет об изысканиях, подбирает профиль шпунта, считает машино-смены. Мы обучили модель на сотнях выполненных проектов, и теперь предварительная смета готова за минуту.</p><h2>Что анализирует модель</h2><p>На вход подается спецификация или отчет об изысканиях. Модель извлекает тип работ, объемы, характеристики грунтов и уровень грунтовых вод, после чего сопоставляет их со складскими остатками шпунта и парком техники.</p><p>Финальную смету по-прежнему подтверждает инженер, но стартовая точка переговоров появляется у заказчика в день обращения.</p>",
            category: "Инновации",
            date: "12 Фев 2026",
            read_time: "6 мин",
            author: "Антон Вебер",
            image: "/assets/journal-ai.png",
        },
        ArticleSeed {
            id: "2",
            title: "Шпунт Ларсена: почему Л5-УМ вытесняет Л4 на сложных объектах",
            slug: "shpunt-larsena-l5um",
            excerpt: "Сравнение моментов сопротивления, реальная экономика выкупа и когда переплата за тяжелый профиль окупается.",
            content: "<p>Профиль Л4 десятилетиями был рабочей лошадкой российских котлованов. Но на глубинах свыше 12 метров его момент сопротивления 2200 см³/м перестает справляться без дополнительных поясов крепления.</p><h2>Экономика вопроса</h2><p>Л5-УМ дороже в закупке, но позволяет отказаться от одного яруса распорной системы. На котловане 40х60 метров это экономит до 15% бюджета ограждения. С учетом обратного выкупа профиля разница в закупочной цене почти не ощущается.</p>",
            category: "Технологии",
            date: "28 Янв 2026",
            read_time: "8 мин",
            author: "Сергей Мостовой",
            image: "/assets/journal-geology.png",
        },
        ArticleSeed {
            id: "3",
            title: "Вдавливание вместо забивки: опыт работы в метре от жилого дома",
            slug: "vdavlivanie-vmesto-zabivki",
            excerpt: "Кейс с объекта в историческом центре Петербурга: как Giken Silent Piler погружал шпунт без единой жалобы от жильцов.",
            content: "<p>Заказчик получил предписание остановить вибропогружение после первых же жалоб из соседнего дома 1905 года постройки. Альтернатива была одна: статическое вдавливание.</p><h2>Как это работает</h2><p>Установка Giken Silent Piler опирается на уже погруженные шпунтины и вдавливает следующую усилием до 150 тонн. Ни удара, ни вибрации, уровень шума сопоставим с проезжающим автомобилем.</p><p>Темп ниже, чем у вибропогружателя, около 120 погонных метров стены в смену, но работы в охранной зоне были согласованы без ограничений по времени.</p>",
            category: "Кейсы",
            date: "15 Янв 2026",
            read_time: "5 мин",
            author: "Антон Вебер",
            image: "/assets/static_piling_expert.png",
        },
    ]
    .iter()
    .map(ArticleSeed::build)
    .collect()
});

static CATEGORIES_FALLBACK: LazyLock<Vec<String>> = LazyLock::new(|| {
    [
        ALL_CATEGORIES,
        "Технологии",
        "Инновации",
        "Геология",
        "Кейсы",
        "Оборудование",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
});

pub fn articles_fallback() -> &'static Vec<Article> {
    &ARTICLES_FALLBACK
}

pub fn article_categories_fallback() -> &'static Vec<String> {
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
    fn test_format_date_variants() {
        assert_eq!(format_date("2026-02-12T08:30:00Z"), "12 Фев 2026");
        assert_eq!(format_date("2026-02-12"), "12 Фев 2026");
        assert_eq!(format_date("позавчера"), "позавчера");
    }

    #[test]
    fn test_transform_minimal_row_is_total() {
        let row: ArticleRow =
            serde_json::from_value(json!({ "id": 7, "title": "Статья", "slug": "statya" }))
                .unwrap();

        let article = transform_article(&offline_cms(), row);
        assert_eq!(article.id, "7");
        assert_eq!(article.category, DEFAULT_CATEGORY);
        assert_eq!(article.date, "");
        assert!(article.seo.is_none());
        // id 7 rotates into the second placeholder slot
        assert_eq!(article.image, PLACEHOLDER_IMAGES[7 % 3]);
    }

    #[test]
    fn test_transform_resolved_category_and_seo() {
        let row: ArticleRow = serde_json::from_value(json!({
            "id": 1,
            "title": "Статья",
            "slug": "statya",
            "category": { "name": "Кейсы" },
            "date_published": "2026-01-15",
            "seo_title": "Кейс"
        }))
        .unwrap();

        let article = transform_article(&offline_cms(), row);
        assert_eq!(article.category, "Кейсы");
        assert_eq!(article.date, "15 Янв 2026");
        let seo = article.seo.unwrap();
        assert_eq!(seo.title, "Кейс");
        assert_eq!(seo.description, "");
    }

    #[test]
    fn test_transform_unresolved_category_uses_default() {
        let row: ArticleRow = serde_json::from_value(json!({
            "id": 2,
            "title": "Статья",
            "slug": "statya",
            "category": 14
        }))
        .unwrap();

        let article = transform_article(&offline_cms(), row);
        assert_eq!(article.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_resolved_image_uses_assets_url() {
        let row: ArticleRow = serde_json::from_value(json!({
            "id": 3,
            "title": "Статья",
            "slug": "statya",
            "image": "abc-123"
        }))
        .unwrap();

        let article = transform_article(&offline_cms(), row);
        assert_eq!(article.image, "http://geotech_cms:8055/assets/abc-123");
    }

    #[test]
    fn test_fallback_respects_category_and_limit() {
        let fallback = articles_fallback();
        assert_eq!(fallback.len(), 3);

        let categories: Vec<&str> = fallback.iter().map(|a| a.category.as_str()).collect();
        assert!(categories.contains(&"Кейсы"));

        let names = article_categories_fallback();
        assert_eq!(names[0], ALL_CATEGORIES);
        assert_eq!(names.len(), 6);
    }
}
