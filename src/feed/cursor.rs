use serde::Serialize;

/// 페이지 커서
/// 다음에 요청할 페이지, 로딩 중 여부, 마지막 페이지 도달 여부
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationCursor {
    page: u32,
    loading: bool,
    exhausted: bool,
}

impl Default for PaginationCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationCursor {
    pub fn new() -> Self {
        Self {
            page: 1,
            loading: false,
            exhausted: false,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// 로딩을 시작한다. 이미 로딩 중이거나 끝났으면 None
    pub fn begin(&mut self) -> Option<u32> {
        if self.loading || self.exhausted {
            return None;
        }
        self.loading = true;
        Some(self.page)
    }

    /// 받은 원본 레코드 수를 기록하고 다음 페이지로 넘어간다.
    /// 빈 페이지면 끝
    pub fn record(&mut self, raw_count: usize) {
        if raw_count == 0 {
            self.exhausted = true;
        } else {
            self.page += 1;
        }
    }

    /// 성공, 실패와 관계없이 로딩 종료
    pub fn finish(&mut self) {
        self.loading = false;
    }
}
