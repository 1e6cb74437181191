use axum::Json;

use carmatch_core::domain::plan::{plan_catalog, SubscriptionPlan};

pub async fn list_plans() -> Json<Vec<SubscriptionPlan>> {
    Json(plan_catalog())
}

#[cfg(test)]
mod tests {
    use axum::Json;

    use super::list_plans;

    #[tokio::test]
    async fn free_plan_is_listed_first() {
        let Json(plans) = list_plans().await;

        assert_eq!(plans[0].id, "free");
        assert!(plans.iter().any(|plan| plan.popular));
    }
}
