use crate::domain::conversation::SessionCounters;

pub const DEFAULT_FREE_RECOMMENDATIONS: u32 = 2;

/// Returned in place of a match once the free recommendations are used up.
pub const UPSELL_MESSAGE: &str = "🚫 הגעת למגבלת ההמלצות החינמיות!

🌟 **שדרג למנוי PRO ותקבל:**
✅ המלצות רכבים ללא הגבלה
✅ גישה למאגר מלא של רכבים
✅ המלצות מתקדמות ומותאמות אישית
✅ השוואת רכבים צד לצד
✅ התראות על רכבים חדשים

💎 **רק 29.90₪ לחודש!**

[לחץ כאן לשדרוג למנוי PRO](/pro-subscription)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed { remaining: u32 },
    LimitReached,
}

/// Cap on free recommendations per session. The count is supplied by the
/// client, so this is a nudge toward the upgrade page rather than access
/// control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecommendationQuota {
    cap: u32,
}

impl Default for RecommendationQuota {
    fn default() -> Self {
        Self { cap: DEFAULT_FREE_RECOMMENDATIONS }
    }
}

impl RecommendationQuota {
    pub fn new(cap: u32) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn check(&self, counters: SessionCounters) -> QuotaDecision {
        if counters.is_limit_reached(self.cap) {
            QuotaDecision::LimitReached
        } else {
            QuotaDecision::Allowed { remaining: self.cap - counters.recommendations_count }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{QuotaDecision, RecommendationQuota, UPSELL_MESSAGE};
    use crate::domain::conversation::SessionCounters;

    #[test]
    fn counts_below_cap_are_allowed() {
        let quota = RecommendationQuota::default();

        assert_eq!(quota.check(SessionCounters::new(0)), QuotaDecision::Allowed { remaining: 2 });
        assert_eq!(quota.check(SessionCounters::new(1)), QuotaDecision::Allowed { remaining: 1 });
    }

    #[test]
    fn counts_at_or_above_cap_are_blocked() {
        let quota = RecommendationQuota::default();

        assert_eq!(quota.check(SessionCounters::new(2)), QuotaDecision::LimitReached);
        assert_eq!(quota.check(SessionCounters::new(40)), QuotaDecision::LimitReached);
    }

    #[test]
    fn zero_cap_blocks_everything() {
        assert_eq!(
            RecommendationQuota::new(0).check(SessionCounters::default()),
            QuotaDecision::LimitReached
        );
    }

    #[test]
    fn upsell_links_to_upgrade_page() {
        assert!(UPSELL_MESSAGE.contains("/pro-subscription"));
    }
}
