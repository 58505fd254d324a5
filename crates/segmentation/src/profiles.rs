//! The six fixed segment profiles.

use segment_core::types::SEGMENT_COUNT;
use segment_core::{CustomerAttributes, SegmentId, SegmentProfile};

#[allow(clippy::too_many_arguments)]
const fn reference(
    income: f64,
    age: f64,
    total_spending: f64,
    recency: f64,
    customer_since: f64,
    num_web_purchases: f64,
    num_store_purchases: f64,
    num_web_visits_month: f64,
) -> CustomerAttributes {
    CustomerAttributes {
        age,
        income,
        total_spending,
        recency,
        customer_since,
        num_web_purchases,
        num_store_purchases,
        num_web_visits_month,
    }
}

/// Segment profiles indexed by segment id.
pub static PROFILES: [SegmentProfile; SEGMENT_COUNT] = [
    SegmentProfile {
        id: SegmentId::HIGH_VALUE_LOYAL,
        name: "High-Value Loyal",
        description: "High-value, loyal customers with strong purchasing power and consistent engagement",
        recommendations: &[
            "Offer premium loyalty rewards and exclusive benefits",
            "Provide early access to new products and services",
            "Implement personalized high-end product recommendations",
            "Create VIP customer service experiences",
        ],
        reference: reference(76_667.0, 57.0, 1200.0, 45.0, 2500.0, 5.0, 9.0, 2.0),
    },
    SegmentProfile {
        id: SegmentId::BUDGET_CONSCIOUS,
        name: "Budget-Conscious",
        description: "Budget-conscious customers who are price-sensitive but engaged",
        recommendations: &[
            "Promote deals, discounts, and special offers",
            "Create bundle offers for better value perception",
            "Highlight budget-friendly alternatives",
            "Implement loyalty programs with cost savings",
        ],
        reference: reference(29_382.0, 50.0, 400.0, 55.0, 2000.0, 2.0, 3.0, 7.0),
    },
    SegmentProfile {
        id: SegmentId::SENIOR,
        name: "Senior Customers",
        description: "Senior customers with consistent but moderate spending patterns",
        recommendations: &[
            "Focus on traditional communication channels",
            "Offer senior discounts and age-appropriate products",
            "Provide clear, detailed product information",
            "Ensure excellent customer support accessibility",
        ],
        reference: reference(49_086.0, 68.0, 600.0, 50.0, 3000.0, 3.0, 5.0, 6.0),
    },
    SegmentProfile {
        id: SegmentId::ACTIVE_BALANCED,
        name: "Active Balanced",
        description: "Active customers with balanced online and offline shopping behavior",
        recommendations: &[
            "Implement omnichannel marketing strategies",
            "Offer cross-channel promotions and rewards",
            "Provide flexible delivery and pickup options",
            "Create seamless online-to-offline experiences",
        ],
        reference: reference(61_240.0, 60.0, 900.0, 40.0, 2200.0, 6.0, 8.0, 6.0),
    },
    SegmentProfile {
        id: SegmentId::PREMIUM,
        name: "Premium",
        description: "Premium customers with exceptional spending power and digital preference",
        recommendations: &[
            "Provide VIP customer service and concierge support",
            "Offer exclusive premium products and limited editions",
            "Implement personal shopping assistance",
            "Create luxury brand partnerships and experiences",
        ],
        reference: reference(666_666.0, 49.0, 5000.0, 30.0, 1500.0, 8.0, 3.0, 6.0),
    },
    SegmentProfile {
        id: SegmentId::MODERATE,
        name: "Moderate",
        description: "Moderate customers with average engagement and spending levels",
        recommendations: &[
            "Launch re-engagement campaigns to increase activity",
            "Offer win-back promotions and incentives",
            "Increase communication frequency with valuable content",
            "Provide personalized product recommendations",
        ],
        reference: reference(39_446.0, 54.0, 500.0, 48.0, 1800.0, 2.0, 3.0, 5.0),
    },
];

pub fn profile(id: SegmentId) -> &'static SegmentProfile {
    &PROFILES[id.index()]
}

/// Case-insensitive lookup by display name.
pub fn profile_by_name(name: &str) -> Option<&'static SegmentProfile> {
    PROFILES.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
