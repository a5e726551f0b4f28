use actix_web::web;

use crate::handlers::{blocks, contact, contact_admin, system};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(system::home);

    cfg.service(
        web::scope("/api/v1")
            .service(system::health_check)
            .service(contact::submit_contact)
            // static segment registered before the {id} pattern
            .service(contact_admin::contact_stats)
            .service(contact_admin::list_contacts)
            .service(contact_admin::update_contact_status)
            .service(blocks::list_blocks)
            .service(blocks::create_block)
            .service(blocks::reorder_blocks)
            .service(blocks::update_block)
            .service(blocks::delete_block),
    );
}
