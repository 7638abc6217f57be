use reqwest::Url;

/// 상품 목록 (페이지 단위)
pub const LISTINGS: &str = "/auction/listings";

/// 상품 검색
pub const SEARCH_LISTINGS: &str = "/auction/listings/search";

/// 판매자, 입찰 정보 포함
pub const EMBED_SELLER_AND_BIDS: [(&str, &str); 2] = [("_seller", "true"), ("_bids", "true")];

/// API 키 헤더
pub const API_KEY_HEADER: &str = "X-Noroff-API-Key";

/// 상품 단건 조회 주소. id 는 경로 한 칸으로만 들어간다 ('/' 등은 인코딩)
pub fn listing_url(base_url: &str, id: &str) -> Option<Url> {
    if id.is_empty() || id == "." || id == ".." {
        return None;
    }
    let mut url = Url::parse(base_url).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(LISTINGS.trim_start_matches('/').split('/'))
        .push(id);
    Some(url)
}
