pub mod hotel_reservation;
pub mod landing;
pub mod overleaf;
