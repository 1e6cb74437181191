use serde::Serialize;

/// A subscription tier shown on the upgrade page. Checkout happens with an
/// external payment provider; these entries are display data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub price_usd: &'static str,
    pub period: &'static str,
    pub features: Vec<&'static str>,
    pub recommendation_limit: Option<u32>,
    pub popular: bool,
}

pub fn plan_catalog() -> Vec<SubscriptionPlan> {
    vec![
        SubscriptionPlan {
            id: "free",
            name: "חינמי",
            price: "0₪",
            price_usd: "$0",
            period: "לחודש",
            features: vec!["2 המלצות רכב בלבד", "גישה מוגבלת לרכבים", "המלצות בסיסיות"],
            recommendation_limit: Some(2),
            popular: false,
        },
        SubscriptionPlan {
            id: "pro",
            name: "PRO",
            price: "29.90₪",
            price_usd: "$9.99",
            period: "לחודש",
            features: vec![
                "המלצות רכבים ללא הגבלה",
                "מאגר רכבים מלא",
                "המלצות מתקדמות",
                "השוואת רכבים",
                "התראות חכמות",
                "תמיכה מועדפת",
            ],
            recommendation_limit: None,
            popular: true,
        },
        SubscriptionPlan {
            id: "premium",
            name: "PREMIUM",
            price: "49.90₪",
            price_usd: "$16.99",
            period: "לחודש",
            features: vec![
                "כל התכונות של PRO",
                "ייעוץ אישי עם מומחה",
                "דוחות מפורטים",
                "גישה מוקדמת לתכונות חדשות",
            ],
            recommendation_limit: None,
            popular: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::plan_catalog;

    #[test]
    fn only_free_plan_is_capped() {
        let plans = plan_catalog();

        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].recommendation_limit, Some(2));
        assert!(plans.iter().skip(1).all(|plan| plan.recommendation_limit.is_none()));
        assert_eq!(plans.iter().filter(|plan| plan.popular).count(), 1);
    }
}
