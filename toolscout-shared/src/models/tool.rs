/// Tool model and database operations
///
/// Catalog entries describing third-party AI products. The `rating` and
/// `review_count` columns are derived: they are written only by the rating
/// aggregator after review mutations, never set directly by clients.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tools (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     category tool_category NOT NULL,
///     price_model price_model NOT NULL,
///     platform platform NOT NULL,
///     price_details VARCHAR(255) NOT NULL,
///     website_url VARCHAR(512) NOT NULL,
///     image_url VARCHAR(512),
///     rating DOUBLE PRECISION NOT NULL DEFAULT 0.0,
///     review_count INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgArguments;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Tool category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tool_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MusicGeneration,
    ImageCreation,
    VideoEditing,
    TextGeneration,
    Automation,
    DataAnalysis,
    Gaming,
    CodeGeneration,
}

/// Pricing model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "price_model", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PriceModel {
    Free,
    Subscription,
    OneTime,
    Freemium,
}

/// Delivery platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "platform", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Web,
    Api,
    Desktop,
    Mobile,
    BrowserExtension,
}

impl Category {
    /// All categories, in declaration order
    pub const ALL: &'static [Category] = &[
        Category::MusicGeneration,
        Category::ImageCreation,
        Category::VideoEditing,
        Category::TextGeneration,
        Category::Automation,
        Category::DataAnalysis,
        Category::Gaming,
        Category::CodeGeneration,
    ];

    /// Wire value, matching the database enum
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MusicGeneration => "music_generation",
            Category::ImageCreation => "image_creation",
            Category::VideoEditing => "video_editing",
            Category::TextGeneration => "text_generation",
            Category::Automation => "automation",
            Category::DataAnalysis => "data_analysis",
            Category::Gaming => "gaming",
            Category::CodeGeneration => "code_generation",
        }
    }
}

impl PriceModel {
    /// All price models, in declaration order
    pub const ALL: &'static [PriceModel] = &[
        PriceModel::Free,
        PriceModel::Subscription,
        PriceModel::OneTime,
        PriceModel::Freemium,
    ];

    /// Wire value, matching the database enum
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceModel::Free => "free",
            PriceModel::Subscription => "subscription",
            PriceModel::OneTime => "one_time",
            PriceModel::Freemium => "freemium",
        }
    }
}

impl Platform {
    /// All platforms, in declaration order
    pub const ALL: &'static [Platform] = &[
        Platform::Web,
        Platform::Api,
        Platform::Desktop,
        Platform::Mobile,
        Platform::BrowserExtension,
    ];

    /// Wire value, matching the database enum
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Api => "api",
            Platform::Desktop => "desktop",
            Platform::Mobile => "mobile",
            Platform::BrowserExtension => "browser_extension",
        }
    }
}

/// Turns a wire value into a display label: "music_generation" -> "Music Generation"
pub fn display_label(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tool model representing a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tool {
    /// Unique tool ID
    pub id: Uuid,

    /// Tool name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Category
    pub category: Category,

    /// Pricing model
    pub price_model: PriceModel,

    /// Delivery platform
    pub platform: Platform,

    /// Human-readable pricing details
    pub price_details: String,

    /// Product website
    pub website_url: String,

    /// Optional image URL
    pub image_url: Option<String>,

    /// Derived average rating, one decimal place
    pub rating: f64,

    /// Derived number of reviews
    pub review_count: i32,

    /// When the tool was added to the catalog
    pub created_at: DateTime<Utc>,

    /// When the tool was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new tool
///
/// Derived columns start at 0.0 / 0 unless the caller supplies seed values.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTool {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub price_model: PriceModel,
    pub platform: Platform,
    pub price_details: String,
    pub website_url: String,
    pub image_url: Option<String>,

    /// Seed-only initial rating (defaults to 0.0)
    #[serde(default)]
    pub rating: f64,

    /// Seed-only initial review count (defaults to 0)
    #[serde(default)]
    pub review_count: i32,
}

/// Catalog listing filter
///
/// All fields optional; combining fields ANDs them. `search` matches a
/// case-insensitive substring of name or description.
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    pub category: Option<Category>,
    pub price_model: Option<PriceModel>,
    pub platform: Option<Platform>,
    pub search: Option<String>,
}

impl ToolFilter {
    /// Builds a WHERE clause with placeholders starting at `$first`
    ///
    /// Placeholder order must match `bind_params`: category, price_model,
    /// platform, search.
    fn where_clause(&self, first: usize) -> String {
        let mut conditions = Vec::new();
        let mut next = first;

        if self.category.is_some() {
            conditions.push(format!("category = ${}", next));
            next += 1;
        }
        if self.price_model.is_some() {
            conditions.push(format!("price_model = ${}", next));
            next += 1;
        }
        if self.platform.is_some() {
            conditions.push(format!("platform = ${}", next));
            next += 1;
        }
        if self.search.is_some() {
            conditions.push(format!(
                "(name ILIKE ${} OR description ILIKE ${})",
                next, next
            ));
            next += 1;
        }

        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }

    /// Number of bind parameters this filter contributes
    fn param_count(&self) -> usize {
        [
            self.category.is_some(),
            self.price_model.is_some(),
            self.platform.is_some(),
            self.search.is_some(),
        ]
        .iter()
        .filter(|p| **p)
        .count()
    }

    /// Binds filter values in the same order as `where_clause`
    fn bind_params<'q, O>(
        &self,
        mut query: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    ) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments> {
        if let Some(category) = self.category {
            query = query.bind(category);
        }
        if let Some(price_model) = self.price_model {
            query = query.bind(price_model);
        }
        if let Some(platform) = self.platform {
            query = query.bind(platform);
        }
        if let Some(ref search) = self.search {
            query = query.bind(format!("%{}%", search));
        }
        query
    }
}

const TOOL_COLUMNS: &str = "id, name, description, category, price_model, platform, \
     price_details, website_url, image_url, rating, review_count, created_at, updated_at";

impl Tool {
    /// Creates a new tool in the catalog
    pub async fn create(pool: &PgPool, data: CreateTool) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO tools (name, description, category, price_model, platform,
                               price_details, website_url, image_url, rating, review_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            TOOL_COLUMNS
        );

        let tool = sqlx::query_as::<_, Tool>(&sql)
            .bind(data.name)
            .bind(data.description)
            .bind(data.category)
            .bind(data.price_model)
            .bind(data.platform)
            .bind(data.price_details)
            .bind(data.website_url)
            .bind(data.image_url)
            .bind(data.rating)
            .bind(data.review_count)
            .fetch_one(pool)
            .await?;

        Ok(tool)
    }

    /// Finds a tool by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM tools WHERE id = $1", TOOL_COLUMNS);

        let tool = sqlx::query_as::<_, Tool>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(tool)
    }

    /// Checks that a tool exists
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let (found,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM tools WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(found)
    }

    /// Lists tools matching a filter, newest first
    ///
    /// Pagination is offset-based; `limit`/`offset` come from the already
    /// clamped `page`/`per_page` query parameters.
    pub async fn list(
        pool: &PgPool,
        filter: &ToolFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let next = filter.param_count() + 1;
        let sql = format!(
            "SELECT {} FROM tools{} ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            TOOL_COLUMNS,
            filter.where_clause(1),
            next,
            next + 1,
        );

        let query = sqlx::query_as::<_, Tool>(&sql);
        let tools = filter
            .bind_params(query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Ok(tools)
    }

    /// Counts tools matching a filter
    pub async fn count(pool: &PgPool, filter: &ToolFilter) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM tools{}", filter.where_clause(1));

        let query = sqlx::query_as::<_, (i64,)>(&sql);
        let (count,) = filter.bind_params(query).fetch_one(pool).await?;

        Ok(count)
    }
}
