// system-tests/tests/suites/products.rs
// ============================================================================
// Module: Product Cases
// Description: Case for the product listing endpoint.
// Purpose: Catch duplicated products in the listing.
// Dependencies: nemlager-harness
// ============================================================================

use async_trait::async_trait;
use nemlager_harness::CaseContext;
use nemlager_harness::CaseResult;
use nemlager_harness::EndpointCase;
use nemlager_harness::Envelope;
use nemlager_harness::checks::duplicate_product_ids;
use nemlager_harness::checks::product_id_counts;
use nemlager_harness::models::ProductSummary;
use nemlager_harness::models::V1_PRODUCTS_PATH;
use reqwest::StatusCode;

use crate::shared::assert_user_auth_required;

/// `GET /api/v1/products`.
pub struct ProductsCase;

#[async_trait]
impl EndpointCase for ProductsCase {
    fn name(&self) -> &'static str {
        "GET /api/v1/products"
    }

    async fn run(&self, ctx: &mut CaseContext) -> CaseResult {
        assert_user_auth_required(ctx, V1_PRODUCTS_PATH).await?;

        let auth = ctx.authenticate().await?;
        let result = ctx
            .client()
            .get::<Envelope<Vec<ProductSummary>>>(V1_PRODUCTS_PATH, CaseContext::user_auth(&auth))
            .await;
        let response = ctx.expect_success(result, StatusCode::OK, "error getting products")?;
        let products = response.body.data;

        let duplicates = duplicate_product_ids(&products);
        for (id, count) in &duplicates {
            ctx.fail(format!("product with id {id} had {count} entries in data"));
        }
        ctx.log(format!("{} products had duplicate data", duplicates.len()));
        ctx.log(format!("{} unique productIDs were in response", product_id_counts(&products).len()));
        Ok(())
    }
}
