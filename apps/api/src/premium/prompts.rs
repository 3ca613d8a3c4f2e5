// All LLM prompt constants for the Premium module.

/// Shared system prompt for premium analyses — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str = "You are an expert resume and hiring analyst. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// ATS scoring prompt template. Replace `{resume}` and `{job_description}`
/// before sending.
pub const ATS_PROMPT_TEMPLATE: &str = r#"Score the resume below against the job description for Applicant Tracking System (ATS) compatibility.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 78,
  "breakdown": {
    "summary": 80,
    "skills": 75,
    "experience": 82,
    "keywords": 70
  },
  "suggestions": [
    "Add the phrase 'data pipelines' to the skills section"
  ]
}

Rules:
- "score" is the overall 0-100 ATS compatibility score.
- Each breakdown field is a 0-100 sub-score for that resume dimension.
- "suggestions" lists 3-5 concrete edits that would raise the score, most impactful first.

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}"#;

/// Interview tips prompt template. Replace `{resume}` and `{job_description}`
/// before sending.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"Prepare interview coaching notes for a candidate with the resume below interviewing for the job described below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "company_culture": {
    "values": ["ownership", "craftsmanship"],
    "mission": "One sentence on what the company is trying to do",
    "talking_points": [
      "A question or topic the candidate should raise"
    ]
  },
  "role_keywords": {
    "technical": ["Rust", "PostgreSQL"],
    "soft": ["written communication"],
    "examples": {
      "Rust": "A one-sentence story prompt connecting the candidate's experience to this keyword"
    }
  }
}

Rules:
- Derive values and mission from the job description only; do not invent company facts.
- "talking_points" lists 3-5 entries.
- Every keyword in "examples" must appear in "technical" or "soft".

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}"#;
