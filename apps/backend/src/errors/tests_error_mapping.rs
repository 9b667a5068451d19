// Domain error to HTTP mapping, without any transport involved.
use actix_web::http::StatusCode;

use crate::errors::domain::{
    ActionKind, DomainError, InfraErrorKind, NotFoundKind, PreconditionKind,
};
use crate::{AppError, ErrorCode};

fn mapped(err: DomainError) -> (ErrorCode, StatusCode) {
    let app: AppError = err.into();
    (app.code(), app.status())
}

#[test]
fn missing_references_are_404() {
    for (kind, code) in [
        (NotFoundKind::Session, ErrorCode::GameNotFound),
        (NotFoundKind::Player, ErrorCode::PlayerNotFound),
        (NotFoundKind::Item, ErrorCode::ItemNotFound),
        (NotFoundKind::Card, ErrorCode::CardNotFound),
        (NotFoundKind::Question, ErrorCode::QuestionNotFound),
    ] {
        assert_eq!(
            mapped(DomainError::not_found(kind, "x")),
            (code, StatusCode::NOT_FOUND)
        );
    }
}

#[test]
fn turn_state_rejections_are_409() {
    assert_eq!(
        mapped(DomainError::phase_mismatch("not betting")),
        (ErrorCode::PhaseMismatch, StatusCode::CONFLICT)
    );
    assert_eq!(
        mapped(DomainError::out_of_turn("wait")),
        (ErrorCode::OutOfTurn, StatusCode::CONFLICT)
    );
    assert_eq!(
        mapped(DomainError::invalid(ActionKind::LobbyClosed, "started")),
        (ErrorCode::LobbyClosed, StatusCode::CONFLICT)
    );
}

#[test]
fn malformed_actions_are_400() {
    assert_eq!(
        mapped(DomainError::invalid(ActionKind::InvalidBet, "maybe")),
        (ErrorCode::InvalidBet, StatusCode::BAD_REQUEST)
    );
    assert_eq!(
        mapped(DomainError::invalid(ActionKind::StaleAnswer, "old")),
        (ErrorCode::StaleAnswer, StatusCode::BAD_REQUEST)
    );
    // Unclassified rejections fall back to the generic code.
    assert_eq!(
        mapped(DomainError::invalid(ActionKind::Other("odd".into()), "odd")),
        (ErrorCode::BadRequest, StatusCode::BAD_REQUEST)
    );
}

#[test]
fn preconditions_are_403() {
    assert_eq!(
        mapped(DomainError::precondition(PreconditionKind::NotHost, "host only")),
        (ErrorCode::NotHost, StatusCode::FORBIDDEN)
    );
}

#[test]
fn infrastructure_failures_are_503() {
    for (kind, code) in [
        (InfraErrorKind::Timeout, ErrorCode::StoreTimeout),
        (InfraErrorKind::Unreachable, ErrorCode::StoreUnavailable),
        (InfraErrorKind::Catalog, ErrorCode::CatalogUnavailable),
        (InfraErrorKind::DataCorruption, ErrorCode::DataCorruption),
    ] {
        assert_eq!(
            mapped(DomainError::unavailable(kind, "down")),
            (code, StatusCode::SERVICE_UNAVAILABLE)
        );
    }
}

#[test]
fn detail_survives_the_conversion() {
    let app: AppError = DomainError::not_found(NotFoundKind::Session, "game ABC123").into();
    assert_eq!(app.to_string(), "Not found: game ABC123");
}
