//! 從任意結構的 JSON 回應中找出數值欄位。
//!
//! 上游 API 的回應格式在不同端點、不同郵遞區號之間並不穩定，所以這裡不走固定路徑，
//! 而是依關鍵字做深度優先搜尋。物件的走訪順序就是文件順序（`serde_json` 啟用
//! `preserve_order`），多個鍵同時命中時，先出現的勝出。

use serde_json::Value;

/// 平均價格的關鍵字
pub const PRICE_KEYWORDS: &[&str] = &[
    "average_price",
    "avg_price",
    "average",
    "price",
    "median",
    "mean",
    "avg",
];

/// 租金收益率的關鍵字
pub const YIELD_KEYWORDS: &[&str] = &[
    "average_yield",
    "average_yield_pct",
    "yield",
    "rental_yield",
    "yield_pct",
    "yield_percent",
    "yield%",
];

/// 巢狀物件中常見的數值欄位，依優先順序
pub const NESTED_VALUE_KEYS: &[&str] = &["value", "amount", "avg", "average", "percentage", "percent"];

const DECORATIONS: &[char] = &[',', '£', '%'];

/// 去除千分位、英鎊符號與百分比後解析為 `f64`。
///
/// `"12%"` 得到 `12.0`，不會除以 100。布林與 null 永遠不是數值。
pub fn normalize_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decorated(s),
        _ => None,
    }
}

pub fn is_numeric_like(value: &Value) -> bool {
    normalize_number(value).is_some()
}

fn parse_decorated(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !DECORATIONS.contains(c)).collect();
    cleaned.trim().parse::<f64>().ok()
}

/// 深度優先搜尋第一個鍵名包含任一關鍵字、且值可轉為數值的欄位。
pub fn find_value_by_keywords(value: &Value, keywords: &[&str]) -> Option<f64> {
    match value {
        Value::Object(map) => {
            for (key, entry) in map {
                let key = key.to_lowercase();
                if keywords.iter().any(|kw| key.contains(kw)) {
                    if let Some(number) = normalize_number(entry) {
                        return Some(number);
                    }
                }

                if let Value::Object(nested) = entry {
                    let hit = NESTED_VALUE_KEYS
                        .iter()
                        .filter_map(|sub| nested.get(*sub))
                        .find_map(normalize_number);
                    if hit.is_some() {
                        return hit;
                    }
                }

                if let Some(found) = find_value_by_keywords(entry, keywords) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items
            .iter()
            .find_map(|item| find_value_by_keywords(item, keywords)),
        _ => None,
    }
}

pub fn extract_avg_price(response: &Value) -> Option<f64> {
    find_value_by_keywords(response, PRICE_KEYWORDS)
}

pub fn extract_rental_yield(response: &Value) -> Option<f64> {
    find_value_by_keywords(response, YIELD_KEYWORDS)
}

/// `data.raw_data[*].price` 的平均值；沒有任何價格時回傳 `None`
pub fn average_price_from_raw(response: &Value) -> Option<f64> {
    let raw = response.get("data")?.get("raw_data")?.as_array()?;
    let prices: Vec<f64> = raw
        .iter()
        .filter_map(|item| item.get("price"))
        .filter_map(normalize_number)
        .collect();

    if prices.is_empty() {
        return None;
    }
    Some(prices.iter().sum::<f64>() / prices.len() as f64)
}
