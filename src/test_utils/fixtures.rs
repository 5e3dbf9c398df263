//! Canned listing blobs in each supported source format.

use serde_json::json;

/// A minimal structured vendor feed for the given product name and price.
pub fn feed_payload(sku_name: &str, price: &str) -> String {
    json!({
        "wareInfoReadMap": {
            "sku_name": sku_name,
            "cn_brand": "TestBrand",
            "product_id": "123456"
        },
        "price": {"p": price}
    })
    .to_string()
}

/// A marketplace listing with labeled prices and a parameters block.
pub fn marketplace_listing() -> &'static str {
    "高露洁官方店洁银牙膏草本清火护龈缓解牙龈出血成人清新口气正品\n\
     券后\n¥\n8.9\n\
     优惠前\n¥\n12.37\n\
     满300减30\n\
     参数信息\n\
     品牌\nColgate/高露洁\n\
     净含量\n120g"
}

/// A generic copy-pasted plain-text listing.
pub fn plain_listing() -> &'static str {
    "三九牌感冒灵颗粒\n¥ 30.00\n满300减30\n8折"
}
