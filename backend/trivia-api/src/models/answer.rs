use serde::{Deserialize, Serialize};

/// Body of `POST /api/checkanswers`. A missing `answerRequests` field is an
/// empty request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswersRequest {
    #[serde(default)]
    pub answer_requests: Vec<AnswerRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_id: i64,
    /// `null` when the client submits an unanswered question.
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub question_id: i64,
    pub result: bool,
}

/// One slot per submitted answer, `None` where the question id is unknown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswersResponse {
    pub answer_response: Vec<Option<AnswerResponse>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_an_empty_request() {
        let req: CheckAnswersRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.answer_requests.is_empty());
    }

    #[test]
    fn null_answer_deserializes_as_none() {
        let req: CheckAnswersRequest = serde_json::from_value(json!({
            "answerRequests": [{ "questionId": 3, "answer": null }]
        }))
        .unwrap();

        assert_eq!(req.answer_requests[0].question_id, 3);
        assert!(req.answer_requests[0].answer.is_none());
    }

    #[test]
    fn missing_verdicts_serialize_as_null() {
        let response = CheckAnswersResponse {
            answer_response: vec![
                Some(AnswerResponse {
                    question_id: 1,
                    result: true,
                }),
                None,
            ],
        };

        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({ "answerResponse": [{ "questionId": 1, "result": true }, null] })
        );
    }
}
