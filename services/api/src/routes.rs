//! API service routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::Query;
use serde_json::json;
use uuid::Uuid;

use crate::{
    auth,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, Viewer},
    models::{
        ListResponse, PageQuery,
        ingredient::IngredientQuery,
        recipe::{
            NewRecipe, Recipe, RecipeQuery, RecipeView, ShoppingListItem, UpdateRecipe,
            flag_is_set,
        },
        user::{
            LoginCredentials, NewUser, SubscriptionQuery, SubscriptionView, TokenResponse, User,
            UserView,
        },
    },
    report,
    repositories::RecipeRelation,
    state::AppState,
    validation,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/token/login/", post(login))
        .route("/api/users/", post(register).get(list_users))
        .route("/api/users/me/", get(current_user))
        .route("/api/users/subscriptions/", get(list_subscriptions))
        .route("/api/users/:id/", get(get_user))
        .route(
            "/api/users/:id/subscribe/",
            post(subscribe).delete(unsubscribe),
        )
        .route("/api/tags/", get(list_tags))
        .route("/api/tags/:id/", get(get_tag))
        .route("/api/ingredients/", get(list_ingredients))
        .route("/api/ingredients/:id/", get(get_ingredient))
        .route("/api/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipes/download_shopping_cart/",
            get(download_shopping_cart),
        )
        .route(
            "/api/recipes/:id/",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/api/recipes/:id/favorite/",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/api/recipes/:id/shopping_cart/",
            post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        )
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "mealshare-api"
    }))
}

/// Public user view with the viewer-relative `is_subscribed` flag
pub async fn user_view(state: &AppState, user: &User, viewer: &Viewer) -> ApiResult<UserView> {
    let is_subscribed = state
        .user_repository
        .is_subscribed(viewer.id(), user.id)
        .await?;
    Ok(UserView::new(user, is_subscribed))
}

/// Author view with embedded recipes and recipe count
pub async fn subscription_view(
    state: &AppState,
    author: &User,
    viewer: &Viewer,
    recipes_limit: Option<i64>,
) -> ApiResult<SubscriptionView> {
    let recipes = state
        .recipe_repository
        .short_by_author(author.id, recipes_limit)
        .await?;
    let recipes_count = state.recipe_repository.count_by_author(author.id).await?;

    Ok(SubscriptionView {
        user: user_view(state, author, viewer).await?,
        recipes,
        recipes_count,
    })
}

/// Full recipe view with viewer-relative favorite/cart flags
pub async fn recipe_view(state: &AppState, recipe: &Recipe, viewer: &Viewer) -> ApiResult<RecipeView> {
    let tags = state.recipe_repository.tags_of(recipe.id).await?;
    let ingredients = state.recipe_repository.ingredients_of(recipe.id).await?;

    let author = state
        .user_repository
        .find_by_id(recipe.author_id)
        .await?
        .ok_or(ApiError::Internal)?;
    let author = user_view(state, &author, viewer).await?;

    // The viewer-relative flags are derived per request, never stored;
    // anonymous viewers always see them as false.
    let (is_favorited, is_in_shopping_cart) = match viewer.id() {
        Some(viewer_id) => (
            state
                .relation_repository
                .exists(RecipeRelation::Favorite, viewer_id, recipe.id)
                .await?,
            state
                .relation_repository
                .exists(RecipeRelation::ShoppingCart, viewer_id, recipe.id)
                .await?,
        ),
        None => (false, false),
    };

    Ok(RecipeView {
        id: recipe.id,
        tags,
        author,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name.clone(),
        image: recipe.image.clone(),
        text: recipe.text.clone(),
        cooking_time: recipe.cooking_time,
    })
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_username(&payload.username).map_err(ApiError::Validation)?;
    validation::validate_email(&payload.email).map_err(ApiError::Validation)?;
    validation::validate_password(&payload.password).map_err(ApiError::Validation)?;

    let user = state.user_repository.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(UserView::new(&user, false))))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ApiResult<impl IntoResponse> {
    let invalid =
        || ApiError::Validation("Unable to log in with provided credentials".to_string());

    let user = state
        .user_repository
        .find_by_email(&credentials.email)
        .await?
        .ok_or_else(invalid)?;

    let verified = auth::verify_password(&credentials.password, &user.password_hash)
        .map_err(|_| ApiError::Internal)?;
    if !verified {
        return Err(invalid());
    }

    let auth_token = auth::create_token(
        user.id,
        &state.settings.jwt_secret,
        state.settings.token_expiry_seconds,
    )
    .map_err(|_| ApiError::Internal)?;

    Ok(Json(TokenResponse { auth_token }))
}

/// List users with pagination
pub async fn list_users(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let (page, limit) = query.resolve(state.settings.page_limit);
    let offset = PageQuery::offset(page, limit);

    let (users, total) = state.user_repository.list(limit as i64, offset).await?;

    let mut items = Vec::with_capacity(users.len());
    for user in &users {
        items.push(user_view(&state, user, &viewer).await?);
    }

    Ok(Json(ListResponse {
        items,
        page,
        limit,
        total,
    }))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user_view(&state, &user, &viewer).await?))
}

/// Get the current authenticated user
pub async fn current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let current = state
        .user_repository
        .find_by_id(user.id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserView::new(&current, false)))
}

/// Subscribe to an author
pub async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<SubscriptionQuery>,
) -> ApiResult<impl IntoResponse> {
    let author = state.user_repository.subscribe(user.id, id).await?;

    let view = subscription_view(&state, &author, &Viewer::from(&user), query.recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Unsubscribe from an author
pub async fn unsubscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.user_repository.unsubscribe(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the current user's subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SubscriptionQuery>,
) -> ApiResult<impl IntoResponse> {
    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit) = page_query.resolve(state.settings.page_limit);
    let offset = PageQuery::offset(page, limit);

    let (authors, total) = state
        .user_repository
        .subscriptions(user.id, limit as i64, offset)
        .await?;

    let viewer = Viewer::from(&user);
    let mut items = Vec::with_capacity(authors.len());
    for author in &authors {
        items.push(subscription_view(&state, author, &viewer, query.recipes_limit).await?);
    }

    Ok(Json(ListResponse {
        items,
        page,
        limit,
        total,
    }))
}

/// List all tags
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tags = state.tag_repository.list().await?;
    Ok(Json(tags))
}

/// Get a tag by ID
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let tag = state
        .tag_repository
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Tag"))?;

    Ok(Json(tag))
}

/// List ingredients, optionally filtered by name prefix
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(query): Query<IngredientQuery>,
) -> ApiResult<impl IntoResponse> {
    let ingredients = state
        .ingredient_repository
        .list(query.name.as_deref())
        .await?;

    Ok(Json(ingredients))
}

/// Get an ingredient by ID
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let ingredient = state
        .ingredient_repository
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Ingredient"))?;

    Ok(Json(ingredient))
}

/// List recipes newest-first with filtering and pagination
pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<RecipeQuery>,
) -> ApiResult<impl IntoResponse> {
    let page_query = PageQuery {
        page: query.page,
        limit: query.limit,
    };
    let (page, limit) = page_query.resolve(state.settings.page_limit);
    let offset = PageQuery::offset(page, limit);

    let (recipes, total) = state
        .recipe_repository
        .list(
            query.author,
            &query.tags,
            flag_is_set(&query.is_favorited),
            flag_is_set(&query.is_in_shopping_cart),
            viewer.id(),
            limit as i64,
            offset,
        )
        .await?;

    let mut items = Vec::with_capacity(recipes.len());
    for recipe in &recipes {
        items.push(recipe_view(&state, recipe, &viewer).await?);
    }

    Ok(Json(ListResponse {
        items,
        page,
        limit,
        total,
    }))
}

/// Create a new recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewRecipe>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_recipe_fields(&payload.name, &payload.image, payload.cooking_time)
        .map_err(ApiError::Validation)?;
    validation::validate_tags(&payload.tags).map_err(ApiError::Validation)?;
    validation::validate_ingredients(&payload.ingredients).map_err(ApiError::Validation)?;

    let recipe = state.recipe_repository.create(user.id, &payload).await?;

    let view = recipe_view(&state, &recipe, &Viewer::from(&user)).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Get a recipe by ID
pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let recipe = state
        .recipe_repository
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;

    Ok(Json(recipe_view(&state, &recipe, &viewer).await?))
}

/// Update a recipe, replacing its tag and ingredient sets
pub async fn update_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRecipe>,
) -> ApiResult<impl IntoResponse> {
    let current = state
        .recipe_repository
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Recipe"))?;

    if current.author_id != user.id {
        return Err(ApiError::Forbidden);
    }

    // Association sets are mandatory on update; partial updates of the
    // tag/ingredient sets are not supported.
    let tags = payload
        .tags
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Tags field is required".to_string()))?;
    let ingredients = payload
        .ingredients
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Ingredients field is required".to_string()))?;

    validation::validate_tags(tags).map_err(ApiError::Validation)?;
    validation::validate_ingredients(ingredients).map_err(ApiError::Validation)?;
    validation::validate_recipe_fields(
        payload.name.as_deref().unwrap_or(&current.name),
        payload.image.as_deref().unwrap_or(&current.image),
        payload.cooking_time.unwrap_or(current.cooking_time),
    )
    .map_err(ApiError::Validation)?;

    let recipe = state
        .recipe_repository
        .update(id, user.id, &payload, tags, ingredients)
        .await?;

    Ok(Json(recipe_view(&state, &recipe, &Viewer::from(&user)).await?))
}

/// Delete a recipe
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.recipe_repository.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Download the aggregated shopping list as a text attachment
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let items: Vec<ShoppingListItem> = state.relation_repository.shopping_list(user.id).await?;
    let content = report::render_shopping_list(&items);

    Ok((
        [
            (CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report::SHOPPING_LIST_FILENAME),
            ),
        ],
        content,
    ))
}

/// Add a recipe to the current user's favorites
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let view = state
        .relation_repository
        .add(RecipeRelation::Favorite, user.id, id)
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Remove a recipe from the current user's favorites
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state
        .relation_repository
        .remove(RecipeRelation::Favorite, user.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add a recipe to the current user's shopping cart
pub async fn add_to_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let view = state
        .relation_repository
        .add(RecipeRelation::ShoppingCart, user.id, id)
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Remove a recipe from the current user's shopping cart
pub async fn remove_from_shopping_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state
        .relation_repository
        .remove(RecipeRelation::ShoppingCart, user.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
