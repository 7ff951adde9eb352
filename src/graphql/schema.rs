use super::health::HealthQuery;
use super::lists::EmailListQuery;
use crate::handlers::validation::pipeline::Verifier;
use async_graphql::{EmptyMutation, EmptySubscription, MergedObject, Schema};
use std::sync::Arc;

/// Root query: health plus the email list operations.
#[derive(MergedObject, Default)]
pub struct QueryRoot(HealthQuery, EmailListQuery);

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Builds the schema with the verifier shared with the REST routes.
///
/// # Example
///
/// ```rust,no_run
/// use email_list_checker::config::AppConfig;
/// use email_list_checker::graphql::schema::create_schema;
/// use email_list_checker::handlers::validation::pipeline::Verifier;
/// use std::sync::Arc;
///
/// let verifier = Arc::new(Verifier::from_config(&AppConfig::default()));
/// let schema = create_schema(verifier);
/// ```
pub fn create_schema(verifier: Arc<Verifier>) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        EmptyMutation::default(),
        EmptySubscription::default(),
    )
    .data(verifier)
    .finish()
}
