//! 위임 인증 프로바이더가 확인해 준 신원

/// 외부 프로바이더 인증 성공 결과
///
/// `external_user_id`는 클라이언트 단계에서 비어 있지 않음이 보장됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatedIdentity {
    /// 프로바이더 측 사용자 ID (로컬 `third_party_id`로 저장)
    pub external_user_id: String,
    /// 프로바이더가 알려준 표시 이름
    pub external_display_name: String,
}
