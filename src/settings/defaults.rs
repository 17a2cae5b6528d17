use serde_json::{json, Value};

/// Baseline domain settings offered when a domain has none yet.
pub fn default_settings() -> Value {
    json!({
        "branding": { "logoUrl": "", "faviconUrl": "" },
        "theme": {
            "theme": "light",
            "colors": { "primary": "#3F51B5", "secondary": "#CDDC39", "accent": "#FF9800" },
            "typography": { "fontFamily": "Inter, Arial, sans-serif", "baseSize": 16 },
            "layout": { "header": "classic", "footer": "minimal", "showTopBar": true, "showTicker": true }
        },
        "navigation": {
            "menu": [
                { "label": "Home", "href": "/" },
                { "label": "Politics", "href": "/category/politics" }
            ]
        },
        "content": { "defaultLanguage": "en", "supportedLanguages": ["en", "te"] },
        "seo": {
            "defaultMetaTitle": "Kaburlu News",
            "defaultMetaDescription": "Latest breaking news and updates.",
            "ogImageUrl": "https://cdn.kaburlu.com/seo/default-og.png",
            "canonicalBaseUrl": "https://news.kaburlu.com"
        },
        "notifications": { "enabled": true, "providers": { "webpush": { "publicKey": "" } } },
        "integrations": { "analytics": { "provider": "gtag", "measurementId": "" } },
        "flags": { "enableComments": true, "enableBookmarks": true },
        "customCss": "body{font-family:Inter;}"
    })
}
