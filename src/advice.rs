//! Flavor-text collaborator
//!
//! A remote service supplies one short tactical tip at game-over and a
//! daily bonus line for the lobby. Both are strictly cosmetic: any
//! failure, timeout, or malformed reply falls back to a canned string and
//! nothing ever blocks the simulation loop.

/// Canned tips, bucketed by how the run went
const FALLBACK_TIPS: [&str; 4] = [
    "Keep moving - a stationary target is a dead one.",
    "Watch the edges; reinforcements always come from off-screen.",
    "Solid run. Trade range for damage when the horde thins out.",
    "Elite performance. Next time, save the dash for the heavies.",
];

pub const FALLBACK_DAILY: &str = "Daily bonus armed - play any mode to claim it!";

/// The tip shown when the service is unavailable; deterministic in score
pub fn fallback_tip(score: u64) -> &'static str {
    match score {
        0..=499 => FALLBACK_TIPS[0],
        500..=1999 => FALLBACK_TIPS[1],
        2000..=9999 => FALLBACK_TIPS[2],
        _ => FALLBACK_TIPS[3],
    }
}

/// Fetch one tip for the final score and hand it to `on_ready`.
///
/// Fire-and-forget: resolves on its own schedule, never gates the loop,
/// and always delivers *something* (the fallback on any failure).
#[cfg(target_arch = "wasm32")]
pub fn request_tip(score: u64, on_ready: impl FnOnce(String) + 'static) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fallback = fallback_tip(score).to_string();
    wasm_bindgen_futures::spawn_local(async move {
        let tip = fetch_tip(score).await.unwrap_or(fallback);
        on_ready(tip);
    });

    async fn fetch_tip(score: u64) -> Option<String> {
        let window = web_sys::window()?;
        let url = format!("/api/tip?score={score}");
        let resp_value = JsFuture::from(window.fetch_with_str(&url)).await.ok()?;
        let resp: web_sys::Response = resp_value.dyn_into().ok()?;
        if !resp.ok() {
            log::warn!("Tip service returned {}", resp.status());
            return None;
        }
        let text = JsFuture::from(resp.text().ok()?).await.ok()?;
        let tip = text.as_string()?;
        let tip = tip.trim();
        if tip.is_empty() { None } else { Some(tip.to_string()) }
    }
}

/// Fetch the lobby's daily bonus line; same contract as `request_tip`.
#[cfg(target_arch = "wasm32")]
pub fn request_daily(on_ready: impl FnOnce(String) + 'static) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    wasm_bindgen_futures::spawn_local(async move {
        let line = fetch_daily().await.unwrap_or_else(|| FALLBACK_DAILY.to_string());
        on_ready(line);
    });

    async fn fetch_daily() -> Option<String> {
        let window = web_sys::window()?;
        let resp_value = JsFuture::from(window.fetch_with_str("/api/daily"))
            .await
            .ok()?;
        let resp: web_sys::Response = resp_value.dyn_into().ok()?;
        if !resp.ok() {
            return None;
        }
        let text = JsFuture::from(resp.text().ok()?).await.ok()?;
        let line = text.as_string()?;
        let line = line.trim();
        if line.is_empty() { None } else { Some(line.to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_covers_all_scores() {
        for score in [0, 1, 499, 500, 1999, 2000, 9999, 10_000, u64::MAX] {
            assert!(!fallback_tip(score).is_empty());
        }
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(fallback_tip(750), fallback_tip(750));
        assert_ne!(fallback_tip(0), fallback_tip(u64::MAX));
    }
}
