pub mod form_registration;
