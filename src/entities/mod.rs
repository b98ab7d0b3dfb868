pub mod alert;
pub mod district;
pub mod region;
pub mod subcounty;
pub mod user;
pub mod verification_token;

pub use alert::Entity as Alert;
pub use district::Entity as District;
pub use region::Entity as Region;
pub use subcounty::Entity as Subcounty;
pub use user::Entity as User;
pub use verification_token::Entity as VerificationToken;
