//! Response schemas sent with each structured request.
//!
//! Types use the uppercase OpenAPI names Gemini expects (`OBJECT`, `STRING`,
//! `ARRAY`). Each schema mirrors a contract in [`super::contracts`].

use serde_json::{Value, json};

pub fn report_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A concise, one-paragraph summary of the key bias findings based on the provided metrics."
            },
            "ethicalImplications": {
                "type": "STRING",
                "description": "A paragraph discussing potential real-world harms and societal impact. Connect this to fairness, accountability, and transparency principles."
            },
            "recommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of 3-5 actionable recommendations for mitigating the identified biases (e.g., data collection strategies, pre-processing techniques)."
            },
            "ethicsStatement": {
                "type": "STRING",
                "description": "A formal ethics statement (around 150-200 words) for the project, acknowledging biases and committing to responsible AI development."
            }
        },
        "required": ["summary", "ethicalImplications", "recommendations", "ethicsStatement"]
    })
}

pub fn scenario_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "scenario": {
                "type": "STRING",
                "description": "A brief, neutral description of the situation or context described in the text (e.g., 'Evaluating candidates for a technical role')."
            },
            "protectedAttribute": {
                "type": "STRING",
                "description": "The characteristic being used for biased comparison (e.g., 'gender', 'age', 'nationality'). This is a label for the concept."
            },
            "privilegedValue": {
                "type": "STRING",
                "description": "The group that is favored in the biased text (e.g., 'Male', 'Younger', 'Local')."
            },
            "unprivilegedValue": {
                "type": "STRING",
                "description": "The group that is disfavored in the biased text (e.g., 'Female', 'Older', 'Foreigner')."
            },
            "outcomeAttribute": {
                "type": "STRING",
                "description": "The name of the outcome or decision being made (e.g., 'hiring_decision', 'loan_status'). This is a label for the concept."
            },
            "favorableOutcome": {
                "type": "STRING",
                "description": "The desirable outcome in this scenario (e.g., 'Hired', 'Approved')."
            },
            "data": {
                "type": "ARRAY",
                "description": "A synthetic dataset of 20-30 JSON objects representing the scenario. This data must mathematically reflect the bias in the original text.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "subject_group": {
                            "type": "STRING",
                            "description": "The value for the protected attribute for this data point. Must be one of the privileged or unprivileged values defined above."
                        },
                        "outcome": {
                            "type": "STRING",
                            "description": "The outcome for this data point. Must be the favorable outcome or an alternative."
                        }
                    },
                    "required": ["subject_group", "outcome"]
                }
            }
        },
        "required": [
            "scenario", "protectedAttribute", "privilegedValue", "unprivilegedValue",
            "outcomeAttribute", "favorableOutcome", "data"
        ]
    })
}

/// Two-string object schema used by the assumption, interpretation and
/// reframing lists.
fn explained_item(field: &str, field_description: &str, explanation: &str) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            field: { "type": "STRING", "description": field_description },
            "explanation": { "type": "STRING", "description": explanation }
        },
        "required": [field, "explanation"]
    })
}

fn list_of(key: &str, description: &str, items: Value) -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            key: { "type": "ARRAY", "description": description, "items": items }
        },
        "required": [key]
    })
}

fn text_analysis_schema() -> Value {
    list_of(
        "findings",
        "A list of phrases identified as potentially biased.",
        json!({
            "type": "OBJECT",
            "properties": {
                "biasedPhrase": {
                    "type": "STRING",
                    "description": "The exact phrase from the original text that is potentially biased. It must be a substring of the original text."
                },
                "explanation": {
                    "type": "STRING",
                    "description": "A brief explanation of why the phrase is considered biased (e.g., perpetuates stereotypes, uses loaded language)."
                },
                "suggestion": {
                    "type": "STRING",
                    "description": "A more neutral alternative to the biased phrase."
                }
            },
            "required": ["biasedPhrase", "explanation", "suggestion"]
        }),
    )
}

fn tone_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": {
                "type": "STRING",
                "enum": ["Positive", "Negative", "Neutral"],
                "description": "The overall sentiment of the text."
            },
            "formality": {
                "type": "STRING",
                "enum": ["Formal", "Informal"],
                "description": "The level of formality in the text."
            },
            "objectivity": {
                "type": "STRING",
                "enum": ["Objective", "Subjective"],
                "description": "Whether the text is objective (fact-based) or subjective (opinion-based)."
            },
            "confidence": {
                "type": "STRING",
                "enum": ["Confident", "Tentative", "Neutral"],
                "description": "The level of confidence expressed in the text."
            },
            "emotionalTones": {
                "type": "ARRAY",
                "description": "A list of 2-4 perceived emotional tones in the text (e.g., 'Dismissive', 'Arrogant', 'Alarmist').",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "tone": { "type": "STRING", "description": "The specific emotional tone identified." },
                        "impact": { "type": "STRING", "description": "How this emotional tone can influence the reader and reinforce bias." }
                    },
                    "required": ["tone", "impact"]
                }
            },
            "summary": {
                "type": "STRING",
                "description": "A brief, one-sentence summary of how the language and tone could influence a reader's perception of the text's potential biases."
            }
        },
        "required": ["sentiment", "formality", "objectivity", "confidence", "emotionalTones", "summary"]
    })
}

pub fn comprehensive_analysis_schema() -> Value {
    let assumptions = list_of(
        "assumptions",
        "A list of unspoken assumptions underpinning the biased statements in the text.",
        explained_item(
            "assumption",
            "The core underlying belief or assumption that is not explicitly stated.",
            "A brief explanation of how this assumption connects to and supports the bias in the text.",
        ),
    );
    let interpretations = list_of(
        "interpretations",
        "A list of key biased interpretations a reader might draw from the text.",
        explained_item(
            "interpretation",
            "A statement summarizing a likely, but biased, interpretation of the text.",
            "A brief explanation of why this interpretation is biased, often by pointing out flawed logic or reliance on stereotypes.",
        ),
    );
    let reframings = list_of(
        "reframings",
        "A list of constructive, unbiased alternative ways to frame the information.",
        explained_item(
            "reframing",
            "A statement that presents the information in a more balanced, fair, and constructive way.",
            "A brief explanation of the ethical principle this reframing upholds (e.g., focusing on individual skills, avoiding generalizations).",
        ),
    );

    json!({
        "type": "OBJECT",
        "properties": {
            "textAnalysis": text_analysis_schema(),
            "toneAnalysis": tone_schema(),
            "unspokenAssumptions": assumptions,
            "biasedInterpretations": interpretations,
            "constructiveReframing": reframings
        },
        "required": [
            "textAnalysis", "toneAnalysis", "unspokenAssumptions",
            "biasedInterpretations", "constructiveReframing"
        ]
    })
}

pub fn bias_spectrum_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "concept": { "type": "STRING", "description": "The original concept provided by the user." },
            "summary": {
                "type": "STRING",
                "description": "A brief, 1-2 sentence summary of the potential stereotypes associated with the concept."
            },
            "spectrum": {
                "type": "ARRAY",
                "description": "An array of bias dimensions and creative alternatives.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "dimension": { "type": "STRING", "description": "The dimension of bias (e.g., 'Gender', 'Age')." },
                        "stereotype": { "type": "STRING", "description": "The common stereotype associated with the concept on this dimension." },
                        "debiasedAlternative": { "type": "STRING", "description": "A creative suggestion for a character or story that subverts this stereotype." }
                    },
                    "required": ["dimension", "stereotype", "debiasedAlternative"]
                }
            }
        },
        "required": ["concept", "summary", "spectrum"]
    })
}

pub fn concept_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "concept": {
                "type": "STRING",
                "description": "The central role, job, or character concept being discussed in the text (e.g., 'programmer', 'leader', 'scientist')."
            }
        },
        "required": ["concept"]
    })
}
