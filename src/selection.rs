use serde::Serialize;

use crate::models::{SelectedService, ServiceWithPrices};

/// The one service that may only be combined with another one, matched by
/// exact display name.
pub const ADD_ON_SERVICE_NAME: &str = "エネルギークリアリング";

pub const ADD_ON_LOCKED_NOTICE: &str = "他のサービスをお選びいただいてから追加できます";
pub const EMPTY_CATALOG_MESSAGE: &str = "サービスが見つかりません";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOption {
    pub price_id: i32,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<String>,
    pub price: i32,
    pub selected: bool,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCard {
    pub service_id: i32,
    pub service_name: String,
    pub icon: &'static str,
    pub accent: &'static str,
    pub description: &'static str,
    pub options: Vec<PriceOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

pub fn service_icon(name: &str) -> &'static str {
    match name {
        "アクセスバース" => "✨",
        "霊視オラクルリーディング" => "🔮",
        ADD_ON_SERVICE_NAME => "🌟",
        _ => "💫",
    }
}

/// Color theme accent of the card, keyed on the display name.
pub fn service_accent(name: &str) -> &'static str {
    match name {
        "アクセスバース" => "purple",
        "霊視オラクルリーディング" => "blue",
        ADD_ON_SERVICE_NAME => "emerald",
        _ => "gray",
    }
}

pub fn service_description(name: &str) -> &'static str {
    match name {
        "アクセスバース" => "意識の制限を解放し、新しい可能性にアクセスできるようになります。",
        "霊視オラクルリーディング" => "直感とオラクルカードを使って、あなたの人生をガイダンスします。",
        ADD_ON_SERVICE_NAME => "他のメニューと組み合わせて、エネルギーの浄化を行います。",
        _ => "",
    }
}

/// `1回` for a flat-fee item, `{n}分` otherwise.
pub fn duration_label(time: Option<i32>) -> String {
    match time {
        Some(t) => format!("{t}分"),
        None => "1回".to_string(),
    }
}

/// Hour/minute breakdown shown under the label for durations of an hour or
/// more, e.g. `90` → `1時間30分`.
pub fn duration_breakdown(time: Option<i32>) -> Option<String> {
    let t = time?;
    if t < 60 {
        return None;
    }
    let hours = t / 60;
    let minutes = t % 60;
    Some(if minutes > 0 {
        format!("{hours}時間{minutes}分")
    } else {
        format!("{hours}時間")
    })
}

/// Whether the current selection belongs to a service other than the add-on.
/// No selection means no: the add-on cannot be the first pick.
pub fn has_other_service_selected(
    services: &[ServiceWithPrices],
    selected_price_id: Option<i32>,
) -> bool {
    let selected_service = selected_price_id.and_then(|price_id| {
        services
            .iter()
            .find(|s| s.prices.iter().any(|p| p.id == price_id))
    });
    match selected_service {
        Some(service) => service.service_name != ADD_ON_SERVICE_NAME,
        None => false,
    }
}

/// One card per service. A service with zero price rows gets zero selectable
/// options; the add-on's options are unselectable until another service's
/// option is the current selection.
pub fn build_cards(
    services: &[ServiceWithPrices],
    selected_price_id: Option<i32>,
) -> Vec<ServiceCard> {
    let other_selected = has_other_service_selected(services, selected_price_id);
    services
        .iter()
        .map(|service| {
            let is_add_on = service.service_name == ADD_ON_SERVICE_NAME;
            let locked = is_add_on && !other_selected;
            ServiceCard {
                service_id: service.id,
                service_name: service.service_name.clone(),
                icon: service_icon(&service.service_name),
                accent: service_accent(&service.service_name),
                description: service_description(&service.service_name),
                options: service
                    .prices
                    .iter()
                    .map(|price| PriceOption {
                        price_id: price.id,
                        label: duration_label(price.time),
                        breakdown: duration_breakdown(price.time),
                        price: price.price,
                        selected: selected_price_id == Some(price.id),
                        selectable: !locked,
                    })
                    .collect(),
                notice: locked.then_some(ADD_ON_LOCKED_NOTICE),
            }
        })
        .collect()
}

/// Resolves a tapped price option into the selection reported upward, or
/// `None` when the option is unknown or the add-on rule forbids it.
pub fn try_select(
    services: &[ServiceWithPrices],
    current_price_id: Option<i32>,
    price_id: i32,
) -> Option<SelectedService> {
    let service = services
        .iter()
        .find(|s| s.prices.iter().any(|p| p.id == price_id))?;
    if service.service_name == ADD_ON_SERVICE_NAME
        && !has_other_service_selected(services, current_price_id)
    {
        return None;
    }
    let price = service.prices.iter().find(|p| p.id == price_id)?;
    Some(SelectedService {
        service_id: service.id,
        price_id: price.id,
        service_name: service.service_name.clone(),
        time: price.time,
        price: price.price,
    })
}
