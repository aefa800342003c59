pub mod voting_escrow;
