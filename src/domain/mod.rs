pub mod icons;
pub mod journal;
pub mod machinery;
pub mod projects;
pub mod services;
pub mod sheet_piles;

pub use icons::{Accent, Icon};
pub use journal::{Article, ArticleQuery, Seo};
pub use machinery::{Machinery, MachineryCategory, MachinerySpec};
pub use projects::{Project, ProjectCategory, ProjectStat, Region};
pub use services::Service;
pub use sheet_piles::{SheetPile, SheetPileSeries};
