pub mod company;
pub mod experience;
pub mod job;
pub mod pending_login;
pub mod review;
pub mod skill;
pub mod talent;
