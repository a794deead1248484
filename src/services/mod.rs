pub mod company_service;
pub mod discord_service;
pub mod experience_service;
pub mod identity_service;
pub mod job_service;
pub mod review_service;
pub mod talent_service;
pub mod twitter_service;
