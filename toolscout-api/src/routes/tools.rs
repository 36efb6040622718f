/// Tool catalog endpoints
///
/// # Endpoints
///
/// - `GET /api/tools` - Filtered/searched/paginated listing
/// - `GET /api/tools/:id` - Single tool
/// - `POST /api/tools` - Add a tool to the catalog
/// - `GET /api/categories|price-models|platforms` - Enum listings
/// - `POST /api/seed-data` - Seed the sample catalog
///
/// The derived `rating`/`review_count` columns cannot be set through
/// `POST /api/tools`; they start at 0.0/0 and change only through the
/// rating aggregator.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use toolscout_shared::models::tool::{
    display_label, Category, CreateTool, Platform, PriceModel, Tool, ToolFilter,
};
use uuid::Uuid;
use validator::Validate;

/// Catalog listing query parameters
///
/// `page` is at least 1, `per_page` is clamped into 1..=100.
#[derive(Debug, Deserialize)]
pub struct ToolsQuery {
    pub category: Option<Category>,
    pub price_model: Option<PriceModel>,
    pub platform: Option<Platform>,
    pub search: Option<String>,

    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

/// Catalog listing response
#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<Tool>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Tool creation request
///
/// Derived columns are intentionally absent from this payload.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateToolRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: String,

    pub category: Category,
    pub price_model: PriceModel,
    pub platform: Platform,

    #[validate(length(min = 1, max = 255, message = "Price details must be 1-255 characters"))]
    pub price_details: String,

    #[validate(length(min = 1, max = 512, message = "Website URL must be 1-512 characters"))]
    pub website_url: String,

    pub image_url: Option<String>,
}

/// Enum listing entry: `{ "value": "music_generation", "label": "Music Generation" }`
#[derive(Debug, Serialize)]
pub struct EnumOption {
    pub value: &'static str,
    pub label: String,
}

/// Lists tools with optional filtering and search
///
/// Filters AND together; `search` matches a case-insensitive substring of
/// name or description. Ordered newest first.
pub async fn list_tools(
    State(state): State<AppState>,
    Query(query): Query<ToolsQuery>,
) -> ApiResult<Json<ToolsResponse>> {
    let page = query.page.max(1);
    let per_page = query.per_page.clamp(1, 100);
    let offset = super::page_offset(page, per_page);

    let filter = ToolFilter {
        category: query.category,
        price_model: query.price_model,
        platform: query.platform,
        search: query.search,
    };

    let total = Tool::count(&state.db, &filter).await?;
    let tools = Tool::list(&state.db, &filter, per_page as i64, offset).await?;

    Ok(Json(ToolsResponse {
        tools,
        total,
        page,
        per_page,
    }))
}

/// Gets a specific tool by ID
pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Tool>> {
    let tool = Tool::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tool not found".to_string()))?;

    Ok(Json(tool))
}

/// Creates a new tool
pub async fn create_tool(
    State(state): State<AppState>,
    Json(req): Json<CreateToolRequest>,
) -> ApiResult<Json<Tool>> {
    req.validate().map_err(ApiError::from_validation)?;

    let tool = Tool::create(
        &state.db,
        CreateTool {
            name: req.name,
            description: req.description,
            category: req.category,
            price_model: req.price_model,
            platform: req.platform,
            price_details: req.price_details,
            website_url: req.website_url,
            image_url: req.image_url,
            rating: 0.0,
            review_count: 0,
        },
    )
    .await?;

    Ok(Json(tool))
}

/// Lists all available categories
pub async fn list_categories() -> Json<Vec<EnumOption>> {
    Json(
        Category::ALL
            .iter()
            .map(|c| EnumOption {
                value: c.as_str(),
                label: display_label(c.as_str()),
            })
            .collect(),
    )
}

/// Lists all available price models
pub async fn list_price_models() -> Json<Vec<EnumOption>> {
    Json(
        PriceModel::ALL
            .iter()
            .map(|pm| EnumOption {
                value: pm.as_str(),
                label: display_label(pm.as_str()),
            })
            .collect(),
    )
}

/// Lists all available platforms
pub async fn list_platforms() -> Json<Vec<EnumOption>> {
    Json(
        Platform::ALL
            .iter()
            .map(|p| EnumOption {
                value: p.as_str(),
                label: display_label(p.as_str()),
            })
            .collect(),
    )
}

/// Seeds the catalog with the sample tool set
///
/// No-op when the catalog already has entries; reports the existing count
/// instead.
pub async fn seed_data(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let existing = Tool::count(&state.db, &ToolFilter::default()).await?;
    if existing > 0 {
        return Ok(Json(json!({
            "message": format!("Database already has {} tools", existing)
        })));
    }

    let samples = sample_tools();
    let count = samples.len();

    for sample in samples {
        Tool::create(&state.db, sample).await?;
    }

    tracing::info!(count, "Seeded sample catalog");

    Ok(Json(json!({
        "message": format!("Successfully seeded {} AI tools", count)
    })))
}

/// The sample catalog used by `POST /api/seed-data`
fn sample_tools() -> Vec<CreateTool> {
    let tool = |name: &str,
                description: &str,
                category: Category,
                price_model: PriceModel,
                price_details: &str,
                website_url: &str,
                rating: f64,
                review_count: i32| CreateTool {
        name: name.to_string(),
        description: description.to_string(),
        category,
        price_model,
        platform: Platform::Web,
        price_details: price_details.to_string(),
        website_url: website_url.to_string(),
        image_url: None,
        rating,
        review_count,
    };

    vec![
        tool(
            "ChatGPT",
            "Advanced conversational AI for text generation, coding assistance, and creative writing",
            Category::TextGeneration,
            PriceModel::Freemium,
            "Free tier available, Plus at $20/month",
            "https://chat.openai.com",
            4.8,
            15420,
        ),
        tool(
            "Midjourney",
            "AI-powered image generation tool creating stunning artwork from text prompts",
            Category::ImageCreation,
            PriceModel::Subscription,
            "Starting at $10/month",
            "https://midjourney.com",
            4.7,
            8930,
        ),
        CreateTool {
            platform: Platform::Desktop,
            ..tool(
                "GitHub Copilot",
                "AI pair programmer that helps you write code faster with intelligent suggestions",
                Category::CodeGeneration,
                PriceModel::Subscription,
                "$10/month for individuals",
                "https://github.com/features/copilot",
                4.6,
                12500,
            )
        },
        tool(
            "Runway ML",
            "Creative suite of AI tools for video editing, generation, and visual effects",
            Category::VideoEditing,
            PriceModel::Freemium,
            "Free tier, Pro at $15/month",
            "https://runwayml.com",
            4.5,
            5670,
        ),
        tool(
            "Mubert",
            "AI music generator creating royalty-free tracks for content creators",
            Category::MusicGeneration,
            PriceModel::Freemium,
            "Free tier, Pro at $11.69/month",
            "https://mubert.com",
            4.3,
            3420,
        ),
        tool(
            "Zapier",
            "Automation platform connecting apps and services with AI-powered workflows",
            Category::Automation,
            PriceModel::Freemium,
            "Free tier, Starter at $19.99/month",
            "https://zapier.com",
            4.4,
            18900,
        ),
        tool(
            "DataRobot",
            "Enterprise AI platform for automated machine learning and predictive analytics",
            Category::DataAnalysis,
            PriceModel::Subscription,
            "Enterprise pricing on request",
            "https://datarobot.com",
            4.2,
            980,
        ),
        tool(
            "Leonardo AI",
            "Advanced AI image generator with fine-tuned models for game assets and art",
            Category::Gaming,
            PriceModel::Freemium,
            "Free tier, Artisan at $10/month",
            "https://leonardo.ai",
            4.6,
            7250,
        ),
        tool(
            "DALL-E 3",
            "OpenAI's latest image generation model with improved prompt adherence",
            Category::ImageCreation,
            PriceModel::Subscription,
            "Available with ChatGPT Plus",
            "https://openai.com/dall-e-3",
            4.7,
            11200,
        ),
        tool(
            "Jasper AI",
            "AI writing assistant for marketing copy, blog posts, and business content",
            Category::TextGeneration,
            PriceModel::Subscription,
            "Creator at $39/month",
            "https://jasper.ai",
            4.4,
            9870,
        ),
    ]
}
