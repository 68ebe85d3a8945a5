/// Handler: GET /
pub async fn home() -> &'static str {
    "Backend is running! Use /api/generate-plan for requests."
}
