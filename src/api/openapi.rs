//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrows, carousel, contact, dashboard, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Management Backend REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::register,
        users::me,
        users::update_profile,
        users::list_users,
        users::delete_user,
        users::update_user_status,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_categories,
        books::featured,
        books::top_borrowed,
        // Borrows
        borrows::request_borrow,
        borrows::request_return,
        borrows::book_status,
        borrows::my_borrowed,
        borrows::history,
        borrows::admin_pending,
        borrows::admin_all,
        borrows::confirm_borrow,
        borrows::confirm_return,
        // Dashboards
        dashboard::member_dashboard,
        dashboard::teacher_dashboard,
        dashboard::admin_dashboard,
        // Contact
        contact::submit,
        contact::list,
        contact::delete,
        // Carousel
        carousel::list,
        carousel::create,
        carousel::update,
        carousel::delete,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::UserStatus,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateProfile,
            crate::models::user::UpdateUserStatus,
            users::RegisterResponse,
            users::MeResponse,
            users::ProfileResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::BookStatus,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookSort,
            books::BookListResponse,
            books::TopBorrowedBook,
            // Borrows
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowStatus,
            crate::models::borrow::BorrowDetails,
            crate::models::borrow::AdminBorrowDetails,
            crate::models::borrow::BorrowSortOrder,
            borrows::BorrowActionResponse,
            borrows::ConfirmResponse,
            borrows::BookBorrowStatus,
            // Dashboards
            dashboard::MemberDashboard,
            dashboard::TeacherDashboard,
            dashboard::AdminDashboard,
            dashboard::AdminDashboardSummary,
            // Contact
            crate::models::contact::ContactMessage,
            crate::models::contact::CreateContactMessage,
            contact::ContactResponse,
            // Carousel
            crate::models::carousel::CarouselSlide,
            crate::models::carousel::CreateSlide,
            crate::models::carousel::UpdateSlide,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Registration and profile management"),
        (name = "books", description = "Book catalog"),
        (name = "borrows", description = "Borrow/return workflow"),
        (name = "admin", description = "Admin confirmation and ledger views"),
        (name = "dashboard", description = "Activity dashboards"),
        (name = "contact", description = "Contact messages"),
        (name = "carousel", description = "Landing page carousel")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
