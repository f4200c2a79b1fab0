use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::brain::ComposedAnswer;
use crate::markup::{self, Block};
use crate::server::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    #[serde(flatten)]
    pub answer: ComposedAnswer,
    pub topic_label: &'static str,
    pub blocks: Vec<Block>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(answer))
}

/// Stateless: classify, compose and pre-render one question.
async fn answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Json<AnswerResponse> {
    let answer = state.composer.answer(&request.question);
    let blocks = markup::parse(&answer.body);
    Json(AnswerResponse {
        topic_label: answer.topic.label(),
        answer,
        blocks,
    })
}
